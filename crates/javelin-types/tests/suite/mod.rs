mod concurrency;
mod fixtures;
mod methods;
mod registry_clone;
mod type_vars;
