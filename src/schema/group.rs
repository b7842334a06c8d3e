use std::fmt;

use super::FunctionSchema;

/// A functional schema together with the out variant that writes into a
/// caller-provided tensor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutGroup {
    pub functional: FunctionSchema,
    pub out: Option<FunctionSchema>,
    pub structured: bool,
}

impl OutGroup {
    pub fn new(functional: FunctionSchema, out: FunctionSchema, structured: bool) -> OutGroup {
        OutGroup {
            functional,
            out: Some(out),
            structured,
        }
    }

    /// The schema the classifier inspects: the out variant when there is
    /// one, otherwise the functional schema.
    pub fn primary(&self) -> &FunctionSchema {
        self.out.as_ref().unwrap_or(&self.functional)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewGroup {
    pub view: FunctionSchema,
    pub root_name: String,
}

impl ViewGroup {
    pub fn new(view: FunctionSchema) -> ViewGroup {
        let root_name = view.base_name().to_string();
        ViewGroup { view, root_name }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperatorGroup {
    Out(OutGroup),
    View(ViewGroup),
}

impl OperatorGroup {
    /// The name the classifier's tables are keyed by.
    pub fn base_op_name(&self) -> &str {
        match self {
            OperatorGroup::Out(g) => g.primary().base_name(),
            OperatorGroup::View(g) => &g.root_name,
        }
    }

    pub fn primary(&self) -> &FunctionSchema {
        match self {
            OperatorGroup::Out(g) => g.primary(),
            OperatorGroup::View(g) => &g.view,
        }
    }

    pub fn as_out(&self) -> Option<&OutGroup> {
        match self {
            OperatorGroup::Out(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&ViewGroup> {
        match self {
            OperatorGroup::View(g) => Some(g),
            _ => None,
        }
    }
}

impl From<OutGroup> for OperatorGroup {
    fn from(g: OutGroup) -> OperatorGroup {
        OperatorGroup::Out(g)
    }
}

impl From<ViewGroup> for OperatorGroup {
    fn from(g: ViewGroup) -> OperatorGroup {
        OperatorGroup::View(g)
    }
}

impl fmt::Display for OperatorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorGroup::Out(g) => write!(f, "{}", g.functional.name),
            OperatorGroup::View(g) => write!(f, "{} (view)", g.view.name),
        }
    }
}
