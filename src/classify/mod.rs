//! Decides which operator groups get generated dispatch code.
//!
//! Rules are checked in order and the first failing rule wins. Each
//! rejection is logged with a fixed tag; the tags are diagnostic output
//! that downstream tooling greps for.

use std::fmt;

use crate::{
    config::{GenConfig, Overrides},
    lowering::{conversion_for, returns_type},
    schema::{FunctionSchema, OperatorGroup, OutGroup, ViewGroup},
};

/// The suffix every unstructured out variant must end with: the last
/// argument is a written tensor, and it is what comes back.
pub const OUT_VARIANT_SUFFIX: &str = "Tensor(a!) out) -> Tensor(a!)";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    HandWritten { op: String },
    Blocked { op: String },
    UnsupportedType { schema: String },
    ViewNonTensorReturn { schema: String },
    NoOutVariant { schema: String },
    NonTensorReturn { schema: String },
    MultipleOutputs { schema: String },
    InputsAlias { op: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::HandWritten { op } => write!(f, "HAND WRITTEN: {}", op),
            RejectReason::Blocked { op } => write!(f, "BLOCKED: {}", op),
            RejectReason::UnsupportedType { schema } => {
                write!(f, "NOT SUPPORTED TYPE CONVERTING: {}", schema)
            }
            RejectReason::ViewNonTensorReturn { schema } => {
                write!(f, "NON-TENSOR RET TYPE: {}", schema)
            }
            RejectReason::NoOutVariant { schema } => write!(f, "NO OUT VARIANT: {}", schema),
            RejectReason::NonTensorReturn { schema } => {
                write!(f, "NON_TENSOR RET TYPE: {}", schema)
            }
            RejectReason::MultipleOutputs { schema } => {
                write!(f, "MULTIPLE OUTPUTS: {}", schema)
            }
            RejectReason::InputsAlias { op } => write!(f, "INPUTS ALIAS: {}", op),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Accepted,
    Rejected(RejectReason),
}

impl Eligibility {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Eligibility::Accepted)
    }

    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Eligibility::Rejected(reason) => Some(reason),
            Eligibility::Accepted => None,
        }
    }
}

/// Every argument of `func` must have a conversion rule.
fn check_arg_types(func: &FunctionSchema) -> Result<(), RejectReason> {
    if func.schema_order_arguments().all(|arg| conversion_for(&arg.ty).is_some()) {
        Ok(())
    } else {
        Err(RejectReason::UnsupportedType {
            schema: func.to_string(),
        })
    }
}

pub struct Classifier<'a> {
    config: &'a GenConfig,
    overrides: &'a dyn Overrides,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a GenConfig) -> Classifier<'a> {
        Classifier {
            config,
            overrides: config,
        }
    }

    pub fn with_overrides(config: &'a GenConfig, overrides: &'a dyn Overrides) -> Classifier<'a> {
        Classifier { config, overrides }
    }

    pub fn config(&self) -> &'a GenConfig {
        self.config
    }

    pub fn overrides(&self) -> &'a dyn Overrides {
        self.overrides
    }

    pub fn is_supported(&self, group: &OperatorGroup) -> bool {
        self.classify(group).is_accepted()
    }

    /// Runs every rule against `group`, logging the reason for a rejection.
    pub fn classify(&self, group: &OperatorGroup) -> Eligibility {
        match self.check(group) {
            Ok(()) => Eligibility::Accepted,
            Err(reason) => {
                log::info!("{}", reason);
                Eligibility::Rejected(reason)
            }
        }
    }

    fn check(&self, group: &OperatorGroup) -> Result<(), RejectReason> {
        let base_op_name = group.base_op_name();
        if self.overrides.is_hand_written(group) {
            return Err(RejectReason::HandWritten {
                op: base_op_name.to_string(),
            });
        }

        if self.config.is_blocked(base_op_name) {
            return Err(RejectReason::Blocked {
                op: base_op_name.to_string(),
            });
        }

        check_arg_types(group.primary())?;
        match group {
            OperatorGroup::View(g) => self.check_view(g),
            OperatorGroup::Out(g) => self.check_out(g),
        }
    }

    fn check_view(&self, g: &ViewGroup) -> Result<(), RejectReason> {
        if returns_type(&g.view.returns) != "at::Tensor" {
            return Err(RejectReason::ViewNonTensorReturn {
                schema: g.view.to_string(),
            });
        }
        Ok(())
    }

    fn check_out(&self, g: &OutGroup) -> Result<(), RejectReason> {
        // the functional form decides too, even when the out form would pass
        check_arg_types(&g.functional)?;

        let func = g.primary();
        if !g.structured {
            let has_out_form = g.out.as_ref().map_or(false, |out| {
                out.to_string().ends_with(OUT_VARIANT_SUFFIX)
                    && out.name.to_string().ends_with(".out")
            });
            if !has_out_form {
                return Err(RejectReason::NoOutVariant {
                    schema: func.to_string(),
                });
            }
        }

        if returns_type(&func.returns) != "at::Tensor &" {
            return Err(RejectReason::NonTensorReturn {
                schema: func.to_string(),
            });
        }

        // the dispatch closure owns exactly one output slot
        if func.arguments.out.len() != 1 {
            return Err(RejectReason::MultipleOutputs {
                schema: func.to_string(),
            });
        }

        if func.arguments.non_out().any(|arg| arg.has_alias()) {
            return Err(RejectReason::InputsAlias {
                op: func.base_name().to_string(),
            });
        }
        Ok(())
    }
}
