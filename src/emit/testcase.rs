use itertools::Itertools;

use crate::{
    classify::Classifier,
    collections::OrderedHashMap,
    config::{GenConfig, Overrides},
    errors::GenResult,
    schema::{BaseTy, FunctionSchema, OperatorGroup, OutGroup, Type, ViewGroup},
};

use super::templates::{self, TestCase, TestRound};

/// Shape literal for a test tensor, e.g. `{6,6,6}`.
fn tensor_shape(index: usize, op_name: &str, config: &GenConfig) -> String {
    if let Some(shape) = config.test_tensor_shape(op_name) {
        return shape.to_string();
    }

    let num_tensors = if index == 0 { 16 } else { 64 };
    let num_dim = config.test_tensor_dim(op_name);
    let mut size_per_dim = (num_tensors + num_dim - 1) / num_dim;
    size_per_dim += size_per_dim % 2;
    format!("{{{}}}", vec![size_per_dim.to_string(); num_dim].join(","))
}

/// The literal expression that initialises a test input of type `ty` in
/// round `index`.
pub fn test_value_expression(
    ty: &Type,
    index: usize,
    op_name: &str,
    config: &GenConfig,
) -> GenResult<String> {
    let base = match ty.unwrap_optional() {
        (Type::Base(base), _) => *base,
        _ => return Err(internal_err!("no test value for type `{}`", ty)),
    };

    Ok(match base {
        BaseTy::Tensor => {
            let shape = tensor_shape(index, op_name, config);
            if config.should_use_int_tensor(op_name) {
                format!("at::randint(1, 100, {}, at::kInt)", shape)
            } else if config.should_use_complex_tensor(op_name) {
                format!("at::randn({}, at::kComplexFloat)", shape)
            } else {
                format!("at::rand({})", shape)
            }
        }
        BaseTy::Int => str!("1"),
        BaseTy::Bool => str!("false"),
        BaseTy::Scalar => str!("2"),
        BaseTy::ScalarType => str!("at::ScalarType::Float"),
        BaseTy::Str => str!("\"floor\""),
        other => return Err(internal_err!("no test value for type `{}`", other)),
    })
}

fn non_out_schema(schema: &FunctionSchema) -> GenResult<()> {
    if schema.is_out_fn() {
        return Err(internal_err!("test inputs requested for out schema `{}`", schema));
    }
    Ok(())
}

/// `auto <name><index> = <value>` for every argument, after the override
/// hook has had its say.
pub fn generate_test_value_definitions(
    schema: &FunctionSchema,
    index: usize,
    config: &GenConfig,
    overrides: &dyn Overrides,
) -> GenResult<String> {
    non_out_schema(schema)?;
    let op_name = schema.base_name();
    let mut arg_map = OrderedHashMap::new();
    for arg in schema.schema_order_arguments() {
        let value = test_value_expression(&arg.ty, index, op_name, config)?;
        arg_map.insert(arg.name.clone(), value);
    }

    overrides.override_test_values(&mut arg_map, op_name, index);
    let defs = arg_map
        .iter()
        .map(|(name, value)| format!("auto {}{} = {}", name, index, value))
        .join(";\n    ");
    Ok(defs + ";")
}

pub fn generate_test_value_names(schema: &FunctionSchema, index: usize) -> GenResult<String> {
    non_out_schema(schema)?;
    Ok(schema
        .schema_order_arguments()
        .map(|arg| format!("{}{}", arg.name, index))
        .join(","))
}

fn ir_type_name(base: BaseTy) -> Option<&'static str> {
    match base {
        BaseTy::Tensor => Some("Tensor"),
        BaseTy::Int => Some("int"),
        BaseTy::Float => Some("float"),
        BaseTy::Str => Some("str"),
        BaseTy::Scalar | BaseTy::ScalarType => Some("int"),
        BaseTy::Bool => Some("bool"),
        _ => None,
    }
}

/// The `%name` of every graph input with its declared IR type, if the
/// type has a spelling in the IR.
pub fn generate_test_ir_arguments(
    schema: &FunctionSchema,
) -> GenResult<Vec<(String, Option<String>)>> {
    schema
        .schema_order_arguments()
        .map(|arg| -> GenResult<(String, Option<String>)> {
            let (base, optional) = match arg.ty.unwrap_optional() {
                (Type::Base(base), optional) => (*base, optional),
                _ => {
                    return Err(internal_err!(
                        "graph input `{}: {}` has no IR type",
                        arg.name,
                        arg.ty
                    ))
                }
            };
            let ty = ir_type_name(base).map(|name| {
                if optional {
                    format!("{}?", name)
                } else {
                    name.to_string()
                }
            });
            Ok((format!("%{}", arg.name), ty))
        })
        .collect()
}

/// Emits one test block per type variant. Out variants run twice with
/// different input shapes; views run once.
pub struct GenOpTestCase<'a> {
    classifier: &'a Classifier<'a>,
}

impl<'a> GenOpTestCase<'a> {
    pub fn new(classifier: &'a Classifier<'a>) -> Self {
        GenOpTestCase { classifier }
    }

    pub fn generate(&self, groups: &[OperatorGroup]) -> GenResult<String> {
        match groups.first() {
            None => Ok(String::new()),
            Some(OperatorGroup::Out(_)) => self.out_variant(groups),
            Some(OperatorGroup::View(_)) => self.view(groups),
        }
    }

    pub fn out_variant(&self, groups: &[OperatorGroup]) -> GenResult<String> {
        let mut generated_type_variants = Vec::with_capacity(groups.len());
        for group in groups {
            self.check_supported(group)?;
            let g = group
                .as_out()
                .ok_or_else(|| internal_err!("`{}` is not an out variant group", group))?;
            let variant = self
                .out_variant_op_test_case_generator(g)
                .map_err(|err| err.with_context(&g.functional.name))?;
            generated_type_variants.push(variant);
        }
        Ok(generated_type_variants.join("\n"))
    }

    pub fn view(&self, groups: &[OperatorGroup]) -> GenResult<String> {
        let mut generated_type_variants = Vec::with_capacity(groups.len());
        for group in groups {
            self.check_supported(group)?;
            let g = group
                .as_view()
                .ok_or_else(|| internal_err!("`{}` is not a view group", group))?;
            let variant = self
                .view_op_test_case_generator(g)
                .map_err(|err| err.with_context(&g.view.name))?;
            generated_type_variants.push(variant);
        }
        Ok(generated_type_variants.join("\n"))
    }

    fn check_supported(&self, group: &OperatorGroup) -> GenResult<()> {
        if !self.classifier.is_supported(group) {
            return Err(internal_err!("`{}` is not supported", group).with_context(group));
        }
        Ok(())
    }

    fn round(&self, schema: &FunctionSchema, index: usize) -> GenResult<(String, String)> {
        let config = self.classifier.config();
        let definitions = generate_test_value_definitions(
            schema,
            index,
            config,
            self.classifier.overrides(),
        )?;
        let names = generate_test_value_names(schema, index)?;
        Ok((definitions, names))
    }

    pub fn out_variant_op_test_case_generator(&self, g: &OutGroup) -> GenResult<String> {
        let schema = &g.functional;
        let op_name = schema.base_name();
        let (first, second) = (self.round(schema, 0)?, self.round(schema, 1)?);
        let check_resize = self.classifier.config().should_check_resize(schema);
        render_test_case(schema, op_name, first, Some(second), check_resize)
    }

    pub fn view_op_test_case_generator(&self, g: &ViewGroup) -> GenResult<String> {
        let schema = &g.view;
        let first = self.round(schema, 0)?;
        render_test_case(schema, &g.root_name, first, None, false)
    }
}

fn render_test_case(
    schema: &FunctionSchema,
    op_name: &str,
    first: (String, String),
    second: Option<(String, String)>,
    check_resize: bool,
) -> GenResult<String> {
    let test_name = schema.type_variant_name().replace('.', "_");
    if !test_name.starts_with(op_name) {
        return Err(internal_err!(
            "test name `{}` does not start with `{}`",
            test_name,
            op_name
        ));
    }

    let returns_one_tensor =
        schema.returns.len() == 1 && schema.returns[0].ty.is_base(BaseTy::Tensor);
    if !returns_one_tensor {
        return Err(internal_err!("`{}` must return exactly one tensor", schema));
    }

    let arg_types = generate_test_ir_arguments(schema)?;
    let arg_declarations = arg_types
        .iter()
        .map(|(name, ty)| match ty {
            Some(ty) => format!("{}: {}", name, ty),
            None => name.clone(),
        })
        .join(", ");
    let arg_names = arg_types.iter().map(|(name, _)| name).join(", ");

    Ok(templates::test_case(&TestCase {
        test_name: &test_name,
        arg_declarations: &arg_declarations,
        op_name,
        arg_names: &arg_names,
        first: TestRound {
            definitions: &first.0,
            names: &first.1,
        },
        second: second.as_ref().map(|(definitions, names)| TestRound {
            definitions,
            names,
        }),
        check_resize,
    }))
}
