//! Hand-curated operator tables and the override hooks built on them.
//!
//! Every table has a built-in default. A JSON config file may replace any
//! of them wholesale; fields it leaves out keep their built-in value.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    collections::OrderedHashMap,
    errors::{GenError, GenErrorKind, GenResult},
    schema::{FunctionSchema, OperatorGroup},
};

mod tables;

/// A per-round replacement for one argument's test literal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestValueOverride {
    pub arg: String,
    pub round0: String,
    pub round1: String,
}

impl TestValueOverride {
    pub fn value(&self, index: usize) -> &str {
        if index == 0 {
            &self.round0
        } else {
            &self.round1
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub blocked_ops: BTreeSet<String>,
    pub hand_written_ops: BTreeSet<String>,
    pub no_resize_ops: BTreeSet<String>,
    pub int_tensor_ops: BTreeSet<String>,
    pub complex_tensor_ops: BTreeSet<String>,
    pub tensor_dim_1_ops: BTreeSet<String>,
    pub tensor_dim_2_ops: BTreeSet<String>,
    pub tensor_shapes: BTreeMap<String, String>,
    pub test_value_overrides: BTreeMap<String, Vec<TestValueOverride>>,
}

fn name_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

lazy_static! {
    static ref BUILTIN: GenConfig = {
        let mut test_value_overrides: BTreeMap<String, Vec<TestValueOverride>> = BTreeMap::new();
        for (op, arg, round0, round1) in tables::TEST_VALUE_OVERRIDES.iter() {
            test_value_overrides
                .entry(op.to_string())
                .or_default()
                .push(TestValueOverride {
                    arg: arg.to_string(),
                    round0: round0.to_string(),
                    round1: round1.to_string(),
                });
        }

        GenConfig {
            blocked_ops: name_set(tables::BLOCKED_OPS),
            hand_written_ops: name_set(tables::HAND_WRITTEN_OPS),
            no_resize_ops: name_set(tables::NO_RESIZE_OPS),
            int_tensor_ops: name_set(tables::INT_TENSOR_OPS),
            complex_tensor_ops: name_set(tables::COMPLEX_TENSOR_OPS),
            tensor_dim_1_ops: name_set(tables::TENSOR_DIM_1_OPS),
            tensor_dim_2_ops: name_set(tables::TENSOR_DIM_2_OPS),
            tensor_shapes: tables::TENSOR_SHAPES
                .iter()
                .map(|(op, shape)| (op.to_string(), shape.to_string()))
                .collect(),
            test_value_overrides,
        }
    };
}

impl Default for GenConfig {
    fn default() -> GenConfig {
        BUILTIN.clone()
    }
}

impl GenConfig {
    /// A config with every table empty.
    pub fn empty() -> GenConfig {
        GenConfig {
            blocked_ops: BTreeSet::new(),
            hand_written_ops: BTreeSet::new(),
            no_resize_ops: BTreeSet::new(),
            int_tensor_ops: BTreeSet::new(),
            complex_tensor_ops: BTreeSet::new(),
            tensor_dim_1_ops: BTreeSet::new(),
            tensor_dim_2_ops: BTreeSet::new(),
            tensor_shapes: BTreeMap::new(),
            test_value_overrides: BTreeMap::new(),
        }
    }

    pub fn from_json(text: &str) -> GenResult<GenConfig> {
        serde_json::from_str(text)
            .map_err(|err| GenError::new(GenErrorKind::Config, err))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> GenResult<GenConfig> {
        let path = path.as_ref();
        log::debug!("loading generator config from {}", path.display());
        let text = fs::read_to_string(path).map_err(|err| GenError::from(err).with_context(path.display()))?;
        GenConfig::from_json(&text).map_err(|err| err.with_context(path.display()))
    }

    pub fn is_blocked(&self, op_name: &str) -> bool {
        self.blocked_ops.contains(op_name)
    }

    /// False for type variants whose out kernels establish their own
    /// output size.
    pub fn should_check_resize(&self, schema: &FunctionSchema) -> bool {
        !self.no_resize_ops.contains(&schema.type_variant_name())
    }

    pub fn should_use_int_tensor(&self, op_name: &str) -> bool {
        self.int_tensor_ops.contains(op_name)
    }

    pub fn should_use_complex_tensor(&self, op_name: &str) -> bool {
        self.complex_tensor_ops.contains(op_name)
    }

    pub fn test_tensor_dim(&self, op_name: &str) -> usize {
        if self.tensor_dim_1_ops.contains(op_name) {
            1
        } else if self.tensor_dim_2_ops.contains(op_name) {
            2
        } else {
            3
        }
    }

    pub fn test_tensor_shape(&self, op_name: &str) -> Option<&str> {
        self.tensor_shapes.get(op_name).map(|s| s.as_str())
    }
}

/// The name an operator group is registered and bucketed under.
pub fn func_name_base_str(group: &OperatorGroup) -> &str {
    match group {
        OperatorGroup::View(g) => &g.root_name,
        OperatorGroup::Out(g) => g.functional.base_name(),
    }
}

/// Hooks that let the surrounding build decide which operators are
/// hand-written and which test literals need replacing.
pub trait Overrides {
    fn is_hand_written(&self, group: &OperatorGroup) -> bool;

    /// May replace or add entries of `arg_map` for operator `op_name` in
    /// round `index`.
    fn override_test_values(
        &self,
        arg_map: &mut OrderedHashMap<String, String>,
        op_name: &str,
        index: usize,
    );
}

impl Overrides for GenConfig {
    fn is_hand_written(&self, group: &OperatorGroup) -> bool {
        self.hand_written_ops.contains(func_name_base_str(group))
    }

    fn override_test_values(
        &self,
        arg_map: &mut OrderedHashMap<String, String>,
        op_name: &str,
        index: usize,
    ) {
        let overrides = unless!(self.test_value_overrides.get(op_name));
        for ov in overrides.iter() {
            arg_map.insert(ov.arg.clone(), ov.value(index).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_schema;
    use crate::schema::ViewGroup;

    #[test]
    fn builtin_tables() {
        let config = GenConfig::default();
        assert!(config.is_blocked("cholesky"));
        assert!(!config.is_blocked("gcd"));
        assert!(config.should_use_int_tensor("gather"));
        assert!(config.should_use_complex_tensor("view_as_real"));
        assert_eq!(config.test_tensor_dim("addmv"), 1);
        assert_eq!(config.test_tensor_dim("mm"), 2);
        assert_eq!(config.test_tensor_dim("gcd"), 3);
        assert_eq!(config.test_tensor_shape("view_as_complex"), Some("{2, 2}"));
        assert_eq!(config.test_tensor_shape("gcd"), None);
    }

    #[test]
    fn resize_check_uses_type_variant_name() {
        let config = GenConfig::default();
        let isin = parse_schema("isin.Scalar_Tensor(Scalar element, Tensor test_elements, *, bool assume_unique=False, bool invert=False) -> Tensor").unwrap();
        let isin_tt = parse_schema("isin.Tensor_Tensor(Tensor elements, Tensor test_elements, *, bool assume_unique=False, bool invert=False) -> Tensor").unwrap();
        let dot = parse_schema("dot(Tensor self, Tensor tensor) -> Tensor").unwrap();
        assert!(!config.should_check_resize(&isin));
        assert!(config.should_check_resize(&isin_tt));
        assert!(!config.should_check_resize(&dot));
    }

    #[test]
    fn json_replaces_only_given_tables() {
        let config = GenConfig::from_json(r#"{"blocked_ops": ["gcd"]}"#).unwrap();
        assert!(config.is_blocked("gcd"));
        assert!(!config.is_blocked("cholesky"));
        assert!(config.should_use_int_tensor("gather"));

        let err = GenConfig::from_json(r#"{"blocked_ops": 3}"#).unwrap_err();
        assert_eq!(err.kind, GenErrorKind::Config);
    }

    #[test]
    fn overrides_keep_argument_order() {
        let config = GenConfig::default();
        let mut arg_map = OrderedHashMap::new();
        arg_map.insert(str!("self"), str!("at::rand({6,6,6})"));
        arg_map.insert(str!("vec1"), str!("at::rand({6,6,6})"));
        arg_map.insert(str!("vec2"), str!("at::rand({6,6,6})"));
        arg_map.insert(str!("beta"), str!("2"));
        config.override_test_values(&mut arg_map, "addr", 1);
        let values = arg_map.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>();
        assert_eq!(
            values,
            vec![
                "self=at::rand({22, 22})",
                "vec1=at::rand({22})",
                "vec2=at::rand({22})",
                "beta=2"
            ]
        );
    }

    #[test]
    fn hand_written_uses_root_name_for_views() {
        let config = GenConfig::default();
        let view = ViewGroup::new(parse_schema("view(Tensor(a) self, SymInt[] size) -> Tensor(a)").unwrap());
        assert!(config.is_hand_written(&view.into()));
    }
}
