use crate::subtyping::class_substitution;
use crate::{
    glb, Result, TyContext, TypeEnv, TypeError, TypeMirror, TypeVar, TypeVarDef, VarOrigin,
    WildcardBound,
};

impl TyContext<'_> {
    /// Capture conversion (JLS 5.1.10).
    ///
    /// Every wildcard argument of `ty` is replaced by a fresh captured variable allocated in this
    /// context; other arguments are kept. For a formal `Pi extends Bi` and a wildcard `? extends
    /// U` the capture's upper bound is `glb(Bi[P:=CAP], U)`, for `? super L` it is `Bi[P:=CAP]`
    /// with lower bound `L`.
    ///
    /// Variables are minted before any bound is computed, so a bound that mentions the class's
    /// own parameters (`Enum<E extends Enum<E>>`) refers to the new captures.
    pub fn capture(&mut self, ty: &TypeMirror) -> Result<TypeMirror> {
        let Some(class) = ty.as_class() else {
            return Err(TypeError::illegal_state(format!(
                "capture conversion of non-class type {}",
                ty.display(self)
            )));
        };
        if !class.args.iter().any(TypeMirror::is_wildcard) {
            return Err(TypeError::illegal_state(format!(
                "capture conversion of {} which has no wildcard type arguments",
                ty.display(self)
            )));
        }

        let formals: Vec<TypeVar> = match self.class(class.symbol) {
            Some(def) => {
                if def.type_params.len() != class.args.len() {
                    return Err(TypeError::ArityMismatch {
                        class: def.name.clone(),
                        expected: def.type_params.len(),
                        found: class.args.len(),
                    });
                }
                def.type_params.clone()
            }
            None => Vec::new(),
        };

        let object = self.common().object.clone();
        let null = self.common().null.clone();

        // Pass 1: a handle per wildcard position.
        let mut args = Vec::with_capacity(class.args.len());
        let mut captured = Vec::new();
        for (idx, arg) in class.args.iter().enumerate() {
            if !arg.is_wildcard() {
                args.push(arg.clone());
                continue;
            }
            let name = self.next_capture_name();
            let var = self.push_var(TypeVarDef::new(
                name,
                VarOrigin::Captured(arg.clone()),
                object.clone(),
                null.clone(),
            ));
            args.push(TypeMirror::from(var));
            captured.push((idx, var));
        }

        let captured_ty = TypeMirror::class(class.symbol, args, class.enclosing.clone());
        // Formals of enclosing classes map to the enclosing type's arguments.
        let subst = captured_ty
            .as_class()
            .and_then(|c| class_substitution(&*self, c))
            .unwrap_or_default();

        // Pass 2: declared bounds and `? super` lower bounds for every capture.
        let mut declared_bounds = Vec::with_capacity(captured.len());
        for &(idx, var) in &captured {
            let declared = match formals.get(idx) {
                Some(formal) => self.upper_bound(*formal).subst(&subst),
                None => object.clone(),
            };
            let lower = match class.args[idx].as_wildcard() {
                Some(WildcardBound::Super(bound)) => bound.clone(),
                _ => null.clone(),
            };
            if let Some(def) = self.local_mut(var.id()) {
                def.set_bounds(declared.clone(), lower);
            }
            declared_bounds.push(declared);
        }

        // Pass 3: `? extends` bounds, once no capture is left with a placeholder bound.
        for ((idx, var), declared) in captured.into_iter().zip(declared_bounds) {
            if let Some(WildcardBound::Extends(bound)) = class.args[idx].as_wildcard() {
                let upper = glb(self, &[declared, bound.clone()]);
                if let Some(def) = self.local_mut(var.id()) {
                    let lower = def.lower_bound().clone();
                    def.set_bounds(upper, lower);
                }
            }
            tracing::trace!(
                target: "javelin.types.capture",
                var = self.type_var_name(var).unwrap_or_default(),
                upper = %self.upper_bound(var).display(self),
                lower = %self.lower_bound(var).display(self),
                "captured wildcard"
            );
        }

        Ok(captured_ty)
    }

    /// Lenient capture for receivers: returns `ty` unchanged when there is nothing to capture
    /// (or the type is malformed) instead of failing.
    pub fn capture_conversion(&mut self, ty: &TypeMirror) -> TypeMirror {
        if !ty.has_wildcard_args() {
            return ty.clone();
        }
        match self.capture(ty) {
            Ok(captured) => captured,
            Err(err) => {
                tracing::debug!(target: "javelin.types.capture", error = %err, "capture skipped");
                ty.clone()
            }
        }
    }
}
