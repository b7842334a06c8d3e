use std::fmt;

/// The closed set of base types that can appear in an operator schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseTy {
    Tensor,
    Int,
    SymInt,
    Float,
    Bool,
    Scalar,
    ScalarType,
    Str,
    Layout,
    Device,
    MemoryFormat,
    Generator,
    Dimname,
}

impl BaseTy {
    pub fn from_name(name: &str) -> Option<BaseTy> {
        Some(match name {
            "Tensor" => BaseTy::Tensor,
            "int" => BaseTy::Int,
            "SymInt" => BaseTy::SymInt,
            "float" => BaseTy::Float,
            "bool" => BaseTy::Bool,
            "Scalar" => BaseTy::Scalar,
            "ScalarType" => BaseTy::ScalarType,
            "str" => BaseTy::Str,
            "Layout" => BaseTy::Layout,
            "Device" => BaseTy::Device,
            "MemoryFormat" => BaseTy::MemoryFormat,
            "Generator" => BaseTy::Generator,
            "Dimname" => BaseTy::Dimname,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            BaseTy::Tensor => "Tensor",
            BaseTy::Int => "int",
            BaseTy::SymInt => "SymInt",
            BaseTy::Float => "float",
            BaseTy::Bool => "bool",
            BaseTy::Scalar => "Scalar",
            BaseTy::ScalarType => "ScalarType",
            BaseTy::Str => "str",
            BaseTy::Layout => "Layout",
            BaseTy::Device => "Device",
            BaseTy::MemoryFormat => "MemoryFormat",
            BaseTy::Generator => "Generator",
            BaseTy::Dimname => "Dimname",
        }
    }
}

impl fmt::Display for BaseTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Base(BaseTy),
    Optional(Box<Type>),
    List { elem: Box<Type>, size: Option<usize> },
}

impl Type {
    pub fn tensor() -> Type {
        Type::Base(BaseTy::Tensor)
    }

    pub fn optional(elem: Type) -> Type {
        Type::Optional(Box::new(elem))
    }

    pub fn list(elem: Type, size: Option<usize>) -> Type {
        Type::List {
            elem: Box::new(elem),
            size,
        }
    }

    pub fn is_base(&self, base: BaseTy) -> bool {
        matches!(self, Type::Base(b) if *b == base)
    }

    pub fn is_tensor_like(&self) -> bool {
        match self {
            Type::Base(b) => *b == BaseTy::Tensor,
            Type::Optional(elem) => elem.is_tensor_like(),
            Type::List { elem, .. } => elem.is_tensor_like(),
        }
    }

    /// Peels a single `Optional` layer, reporting whether one was present.
    pub fn unwrap_optional(&self) -> (&Type, bool) {
        match self {
            Type::Optional(elem) => (elem.as_ref(), true),
            other => (other, false),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Base(b) => write!(f, "{}", b),
            Type::Optional(elem) => write!(f, "{}?", elem),
            Type::List { elem, size } => match size {
                Some(n) => write!(f, "{}[{}]", elem, n),
                None => write!(f, "{}[]", elem),
            },
        }
    }
}
