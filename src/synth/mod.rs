//! Synthesis of the C++ expressions inside a dispatch closure: argument
//! extraction from the processed node's inputs, and the kernel calls for
//! each variant.

use itertools::Itertools;

use crate::{
    catalog::BackendIndex,
    errors::GenResult,
    lowering::{conversion_for, cpp_name},
    schema::{FunctionSchema, OutGroup, ViewGroup},
};

/// One `const auto[&] name = p_node->Input(i).method` binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgBinding {
    pub name: String,
    pub index: usize,
    pub by_reference: bool,
    pub method: &'static str,
}

impl ArgBinding {
    pub fn render(&self) -> String {
        let reference = if self.by_reference { "&" } else { "" };
        format!(
            "const auto{} {} = p_node->Input({}).{}",
            reference, self.name, self.index, self.method
        )
    }
}

/// A call to a kernel: `at::<namespace>::<kernel>(<args>)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelCall {
    pub namespace: &'static str,
    pub kernel: String,
    pub args: Vec<String>,
}

impl KernelCall {
    pub fn render(&self) -> String {
        format!("at::{}::{}({})", self.namespace, self.kernel, self.args.join(","))
    }
}

fn namespace(structured: bool) -> &'static str {
    if structured {
        "cpu"
    } else {
        "native"
    }
}

/// Bindings for every argument of `schema`, indexed by schema order.
pub fn arg_bindings(schema: &FunctionSchema) -> GenResult<Vec<ArgBinding>> {
    schema
        .schema_order_arguments()
        .enumerate()
        .map(|(index, arg)| -> GenResult<ArgBinding> {
            let conversion = conversion_for(&arg.ty).ok_or_else(|| {
                internal_err!(
                    "no conversion rule for argument `{}: {}` of `{}`",
                    arg.name,
                    arg.ty,
                    schema
                )
            })?;
            Ok(ArgBinding {
                name: arg.name.clone(),
                index,
                by_reference: conversion.by_reference,
                method: conversion.method,
            })
        })
        .collect()
}

pub fn generate_arg_extraction(schema: &FunctionSchema) -> GenResult<String> {
    let bindings = arg_bindings(schema)?;
    Ok(bindings.iter().map(ArgBinding::render).join(";\n    ") + ";")
}

/// Structured kernels always use the derived name; otherwise a backend
/// override wins when present.
fn resolve_kernel(
    schema: &FunctionSchema,
    structured: bool,
    backend_index: &dyn BackendIndex,
) -> String {
    match backend_index.get_kernel(schema) {
        Some(meta) if !structured => meta.kernel,
        _ => cpp_name(schema),
    }
}

pub fn get_kernel_name(g: &OutGroup, backend_index: &dyn BackendIndex) -> String {
    resolve_kernel(&g.functional, g.structured, backend_index)
}

pub fn get_out_kernel_name(g: &OutGroup, backend_index: &dyn BackendIndex) -> GenResult<String> {
    let out = out_schema(g)?;
    Ok(resolve_kernel(out, g.structured, backend_index))
}

fn out_schema(g: &OutGroup) -> GenResult<&FunctionSchema> {
    g.out
        .as_ref()
        .ok_or_else(|| internal_err!("`{}` has no out variant", g.functional.name))
}

pub fn non_out_variant_call(
    g: &OutGroup,
    backend_index: &dyn BackendIndex,
) -> GenResult<KernelCall> {
    let schema = &g.functional;
    if schema.is_out_fn() {
        return Err(internal_err!("functional schema `{}` has out arguments", schema));
    }

    Ok(KernelCall {
        namespace: namespace(g.structured),
        kernel: get_kernel_name(g, backend_index),
        args: schema
            .schema_order_arguments()
            .map(|arg| arg.name.clone())
            .collect(),
    })
}

pub fn view_call(g: &ViewGroup, backend_index: &dyn BackendIndex) -> KernelCall {
    let schema = &g.view;
    let kernel = backend_index
        .get_kernel(schema)
        .map(|meta| meta.kernel)
        .unwrap_or_else(|| cpp_name(schema));
    KernelCall {
        namespace: "native",
        kernel,
        args: schema
            .schema_order_arguments()
            .map(|arg| arg.name.clone())
            .collect(),
    }
}

/// Structured out kernels take their outputs first; unstructured ones take
/// the single output last.
pub fn out_variant_call(g: &OutGroup, backend_index: &dyn BackendIndex) -> GenResult<KernelCall> {
    let schema = out_schema(g)?;
    if !schema.is_out_fn() {
        return Err(internal_err!("out schema `{}` has no out arguments", schema));
    }

    let kernel = get_out_kernel_name(g, backend_index)?;
    let out_names = schema.arguments.out.iter().map(|arg| arg.name.clone());
    let non_out_names = schema.arguments.non_out().map(|arg| arg.name.clone());
    let args: Vec<String> = if g.structured {
        out_names.chain(non_out_names).collect()
    } else {
        if schema.arguments.out.len() != 1 {
            return Err(internal_err!(
                "unstructured out variant `{}` must have exactly one output, found {}",
                schema.name,
                schema.arguments.out.len()
            ));
        }
        non_out_names.chain(out_names).collect()
    };

    Ok(KernelCall {
        namespace: namespace(g.structured),
        kernel,
        args,
    })
}

pub fn generate_non_out_variant_call(
    g: &OutGroup,
    backend_index: &dyn BackendIndex,
) -> GenResult<String> {
    non_out_variant_call(g, backend_index).map(|call| call.render())
}

pub fn generate_call_to_view_ops(g: &ViewGroup, backend_index: &dyn BackendIndex) -> String {
    view_call(g, backend_index).render()
}

pub fn generate_out_variant_call(
    g: &OutGroup,
    backend_index: &dyn BackendIndex,
) -> GenResult<String> {
    out_variant_call(g, backend_index).map(|call| call.render())
}

#[cfg(test)]
mod tests;
