//! Lowering of schema types to the C++ expressions the generated code uses.

use std::collections::HashMap;

use itertools::Itertools;

use crate::schema::{BaseTy, FunctionSchema, Return, Type};

/// How a boxed value is unpacked into a local of the right static type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Conversion {
    pub by_reference: bool,
    pub method: &'static str,
}

impl Conversion {
    const fn by_ref(method: &'static str) -> Conversion {
        Conversion {
            by_reference: true,
            method,
        }
    }

    const fn by_value(method: &'static str) -> Conversion {
        Conversion {
            by_reference: false,
            method,
        }
    }
}

/// The direct and `Optional`-wrapped conversions for one base type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversionRule {
    pub direct: Conversion,
    pub optional: Conversion,
}

lazy_static! {
    static ref CONVERSION_RULES: HashMap<BaseTy, ConversionRule> = {
        let mut rules = HashMap::new();
        let mut add = |ty, direct, optional| {
            rules.insert(ty, ConversionRule { direct, optional });
        };
        add(
            BaseTy::Tensor,
            Conversion::by_ref("toTensor()"),
            Conversion::by_value("toOptional<at::Tensor>()"),
        );
        add(
            BaseTy::Int,
            Conversion::by_value("toInt()"),
            Conversion::by_value("toOptional<int64_t>()"),
        );
        add(
            BaseTy::Bool,
            Conversion::by_value("toBool()"),
            Conversion::by_value("toOptional<bool>()"),
        );
        add(
            BaseTy::Scalar,
            Conversion::by_value("toScalar()"),
            Conversion::by_value("toOptional<at::Scalar>()"),
        );
        add(
            BaseTy::ScalarType,
            Conversion::by_value("toScalarType()"),
            Conversion::by_value("toOptional<at::ScalarType>()"),
        );
        add(
            BaseTy::Str,
            Conversion::by_value("toStringView()"),
            Conversion::by_value("toOptional<c10::string_view>()"),
        );
        rules
    };
}

pub fn conversion_rule(base: BaseTy) -> Option<&'static ConversionRule> {
    CONVERSION_RULES.get(&base)
}

/// Returns the `IValue` method that extracts a value of type `ty`, or
/// `None` when the type cannot be converted automatically. Lists, and
/// optionals of anything but a base type, are never convertible.
pub fn conversion_for(ty: &Type) -> Option<Conversion> {
    match ty {
        Type::Base(base) => conversion_rule(*base).map(|rule| rule.direct),
        Type::Optional(elem) => match elem.as_ref() {
            Type::Base(base) => conversion_rule(*base).map(|rule| rule.optional),
            _ => None,
        },
        Type::List { .. } => None,
    }
}

/// The C++ symbol name derived from a schema: the base name plus `_` for
/// inplace variants and `_out` for out variants.
pub fn cpp_name(schema: &FunctionSchema) -> String {
    let mut name = schema.name.name.to_string();
    if schema.is_out_fn() {
        name.push_str("_out");
    }
    name
}

fn value_type(ty: &Type) -> String {
    match ty {
        Type::Base(base) => str!(match base {
            BaseTy::Tensor => "at::Tensor",
            BaseTy::Int => "int64_t",
            BaseTy::SymInt => "c10::SymInt",
            BaseTy::Float => "double",
            BaseTy::Bool => "bool",
            BaseTy::Scalar => "at::Scalar",
            BaseTy::ScalarType => "at::ScalarType",
            BaseTy::Str => "c10::string_view",
            BaseTy::Layout => "at::Layout",
            BaseTy::Device => "at::Device",
            BaseTy::MemoryFormat => "at::MemoryFormat",
            BaseTy::Generator => "at::Generator",
            BaseTy::Dimname => "at::Dimname",
        }),
        Type::Optional(elem) => format!("::std::optional<{}>", value_type(elem)),
        Type::List { elem, .. } => format!("::std::vector<{}>", value_type(elem)),
    }
}

/// The C++ type of a single return. Written tensors come back by mutable
/// reference.
pub fn return_type(ret: &Return) -> String {
    if ret.ty.is_base(BaseTy::Tensor) && ret.is_write() {
        return str!("at::Tensor &");
    }
    value_type(&ret.ty)
}

pub fn returns_type(returns: &[Return]) -> String {
    match returns {
        [] => str!("void"),
        [ret] => return_type(ret),
        rets => format!("::std::tuple<{}>", rets.iter().map(return_type).join(",")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_schema;
    use crate::schema::Annotation;

    #[test]
    fn tensor_is_the_only_reference_conversion() {
        let all = [
            BaseTy::Tensor,
            BaseTy::Int,
            BaseTy::Bool,
            BaseTy::Scalar,
            BaseTy::ScalarType,
            BaseTy::Str,
        ];
        for base in all.iter() {
            let direct = conversion_for(&Type::Base(*base)).unwrap();
            let optional = conversion_for(&Type::optional(Type::Base(*base))).unwrap();
            assert_eq!(direct.by_reference, *base == BaseTy::Tensor, "{}", base);
            assert!(!optional.by_reference);
        }
        assert_eq!(conversion_for(&Type::tensor()).unwrap().method, "toTensor()");
        assert_eq!(
            conversion_for(&Type::optional(Type::Base(BaseTy::Str))).unwrap().method,
            "toOptional<c10::string_view>()"
        );
    }

    #[test]
    fn unmapped_types_have_no_rule() {
        assert!(conversion_for(&Type::Base(BaseTy::Float)).is_none());
        assert!(conversion_for(&Type::Base(BaseTy::Layout)).is_none());
        assert!(conversion_for(&Type::list(Type::Base(BaseTy::Int), None)).is_none());
        assert!(conversion_for(&Type::list(Type::tensor(), Some(2))).is_none());
        assert!(conversion_for(&Type::optional(Type::list(Type::Base(BaseTy::Int), None))).is_none());
    }

    #[test]
    fn cpp_names() {
        let functional = parse_schema("add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor").unwrap();
        let out = parse_schema("add.out(Tensor self, Tensor other, *, Scalar alpha=1, Tensor(a!) out) -> Tensor(a!)").unwrap();
        let inplace = parse_schema("add_.Tensor(Tensor(a!) self, Tensor other, *, Scalar alpha=1) -> Tensor(a!)").unwrap();
        assert_eq!(cpp_name(&functional), "add");
        assert_eq!(cpp_name(&out), "add_out");
        assert_eq!(cpp_name(&inplace), "add_");
    }

    #[test]
    fn return_types() {
        let tensor = Return::new(Type::tensor());
        let written = Return::new(Type::tensor()).with_annotation(Annotation::write("a"));
        let view = Return::new(Type::tensor()).with_annotation(Annotation::alias("a"));
        assert_eq!(returns_type(&[tensor.clone()]), "at::Tensor");
        assert_eq!(returns_type(&[written]), "at::Tensor &");
        assert_eq!(returns_type(&[view]), "at::Tensor");
        assert_eq!(returns_type(&[]), "void");
        assert_eq!(
            returns_type(&[tensor.clone(), tensor]),
            "::std::tuple<at::Tensor,at::Tensor>"
        );
        assert_eq!(
            returns_type(&[Return::new(Type::optional(Type::tensor()))]),
            "::std::optional<at::Tensor>"
        );
    }
}
