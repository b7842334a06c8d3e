//! The typed operator-schema model.
//!
//! A [`FunctionSchema`] is immutable once it has been parsed from the
//! catalog. Its `Display` form is the canonical schema text, which the
//! generators embed verbatim as the runtime match guard, so it has to
//! round-trip exactly.

use std::fmt;

use itertools::Itertools;

mod group;
mod ty;

pub use group::{OperatorGroup, OutGroup, ViewGroup};
pub use ty::{BaseTy, Type};

/// An alias annotation such as `(a)` or `(a!)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub alias_set: Vec<String>,
    pub is_write: bool,
}

impl Annotation {
    pub fn write<S: ToString>(alias: S) -> Annotation {
        Annotation {
            alias_set: vec![alias.to_string()],
            is_write: true,
        }
    }

    pub fn alias<S: ToString>(alias: S) -> Annotation {
        Annotation {
            alias_set: vec![alias.to_string()],
            is_write: false,
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alias_set.join("|"))?;
        if self.is_write {
            write!(f, "!")?;
        }
        Ok(())
    }
}

/// Renders a type with its annotation spliced in after `Tensor`,
/// e.g. `Tensor(a!)` or `Tensor(a)?`.
fn annotated_type(ty: &Type, annotation: &Option<Annotation>) -> String {
    let ty = ty.to_string();
    match annotation {
        Some(annotation) => ty.replacen("Tensor", &format!("Tensor({})", annotation), 1),
        None => ty,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Argument {
    pub name: String,
    pub ty: Type,
    pub default: Option<String>,
    pub annotation: Option<Annotation>,
}

impl Argument {
    pub fn new<S: ToString>(name: S, ty: Type) -> Argument {
        Argument {
            name: name.to_string(),
            ty,
            default: None,
            annotation: None,
        }
    }

    pub fn with_default<S: ToString>(mut self, default: S) -> Argument {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Argument {
        self.annotation = Some(annotation);
        self
    }

    pub fn is_self(&self) -> bool {
        self.name == "self"
    }

    pub fn has_alias(&self) -> bool {
        self.annotation
            .as_ref()
            .map(|a| !a.alias_set.is_empty())
            .unwrap_or(false)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", annotated_type(&self.ty, &self.annotation), self.name)?;
        if let Some(default) = &self.default {
            write!(f, "={}", default)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Arguments {
    pub positional: Vec<Argument>,
    pub kwarg_only: Vec<Argument>,
    pub out: Vec<Argument>,
}

impl Arguments {
    /// Positional and keyword-only arguments, in declaration order.
    pub fn non_out(&self) -> impl Iterator<Item = &Argument> {
        self.positional.iter().chain(self.kwarg_only.iter())
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.kwarg_only.len() + self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.positional.iter().map(|a| a.to_string()).collect::<Vec<_>>();
        if !self.kwarg_only.is_empty() || !self.out.is_empty() {
            parts.push(str!("*"));
        }
        parts.extend(self.kwarg_only.iter().map(|a| a.to_string()));
        parts.extend(self.out.iter().map(|a| a.to_string()));
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Return {
    pub name: Option<String>,
    pub ty: Type,
    pub annotation: Option<Annotation>,
}

impl Return {
    pub fn new(ty: Type) -> Return {
        Return {
            name: None,
            ty,
            annotation: None,
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Return {
        self.annotation = Some(annotation);
        self
    }

    pub fn is_write(&self) -> bool {
        self.annotation.as_ref().map(|a| a.is_write).unwrap_or(false)
    }
}

impl fmt::Display for Return {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", annotated_type(&self.ty, &self.annotation))?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseOperatorName {
    pub base: String,
    pub inplace: bool,
}

impl fmt::Display for BaseOperatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if self.inplace {
            write!(f, "_")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OperatorName {
    pub name: BaseOperatorName,
    pub overload_name: String,
}

impl OperatorName {
    pub fn new<S: ToString, T: ToString>(base: S, overload_name: T) -> OperatorName {
        OperatorName {
            name: BaseOperatorName {
                base: base.to_string(),
                inplace: false,
            },
            overload_name: overload_name.to_string(),
        }
    }
}

impl fmt::Display for OperatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.overload_name.is_empty() {
            write!(f, ".{}", self.overload_name)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionSchema {
    pub name: OperatorName,
    pub arguments: Arguments,
    pub returns: Vec<Return>,
}

impl FunctionSchema {
    pub fn base_name(&self) -> &str {
        &self.name.name.base
    }

    pub fn is_out_fn(&self) -> bool {
        !self.arguments.out.is_empty()
    }

    pub fn is_inplace(&self) -> bool {
        self.name.name.inplace
    }

    /// A view returns a single tensor aliasing one of its inputs without
    /// writing to it.
    pub fn is_view(&self) -> bool {
        !self.is_out_fn()
            && self.returns.len() == 1
            && self.returns[0]
                .annotation
                .as_ref()
                .map(|a| !a.is_write)
                .unwrap_or(false)
    }

    /// Every argument in schema order: positional, then keyword-only,
    /// then out.
    pub fn schema_order_arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.non_out().chain(self.arguments.out.iter())
    }

    /// The schema text up to the argument list, e.g. `isin.Scalar_Tensor`.
    pub fn type_variant_name(&self) -> String {
        self.name.to_string()
    }

    /// A key shared by the functional, inplace and out forms of one
    /// operator: the base name, non-out arguments and return types with
    /// every annotation, default and overload name stripped.
    pub fn signature_key(&self) -> String {
        let args = self
            .arguments
            .non_out()
            .map(|a| format!("{} {}", a.ty, a.name))
            .join(", ");
        let rets = if self.is_out_fn() {
            self.arguments.out.iter().map(|a| a.ty.to_string()).join(", ")
        } else {
            self.returns.iter().map(|r| r.ty.to_string()).join(", ")
        };
        format!("{}({}) -> ({})", self.base_name(), args, rets)
    }
}

impl fmt::Display for FunctionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let returns = self.returns.iter().map(|r| r.to_string()).join(", ");
        if self.returns.len() == 1 {
            write!(f, "{}({}) -> {}", self.name, self.arguments, returns)
        } else {
            write!(f, "{}({}) -> ({})", self.name, self.arguments, returns)
        }
    }
}
