#![cfg(test)]

use crate::{
    catalog::DispatchIndex,
    errors::GenErrorKind,
    parse::parse_schema,
    schema::{FunctionSchema, OperatorName, OutGroup, ViewGroup},
};

use super::*;

fn schema(text: &str) -> FunctionSchema {
    parse_schema(text).expect("schema should parse")
}

fn addmv(structured: bool) -> OutGroup {
    OutGroup::new(
        schema("addmv(Tensor self, Tensor mat, Tensor vec, *, Scalar beta=1, Scalar alpha=1) -> Tensor"),
        schema("addmv.out(Tensor self, Tensor mat, Tensor vec, *, Scalar beta=1, Scalar alpha=1, Tensor(a!) out) -> Tensor(a!)"),
        structured,
    )
}

#[test]
fn extraction_binds_tensors_by_reference() {
    let s = schema("clamp(Tensor self, Scalar? min=None, Scalar? max=None) -> Tensor");
    assert_eq!(
        generate_arg_extraction(&s).unwrap(),
        "const auto& self = p_node->Input(0).toTensor();\n    \
         const auto min = p_node->Input(1).toOptional<at::Scalar>();\n    \
         const auto max = p_node->Input(2).toOptional<at::Scalar>();"
    );
}

#[test]
fn extraction_fails_loudly_for_unconvertible_types() {
    let s = schema("amax(Tensor self, int[1] dim=[], bool keepdim=False) -> Tensor");
    let err = generate_arg_extraction(&s).unwrap_err();
    assert_eq!(err.kind, GenErrorKind::Internal);
    assert!(err.msg.contains("dim"));
}

#[test]
fn structured_out_call_puts_outputs_first() {
    let index = DispatchIndex::new("CPU");
    let call = out_variant_call(&addmv(true), &index).unwrap();
    assert_eq!(call.args, vec!["out", "self", "mat", "vec", "beta", "alpha"]);
    assert_eq!(call.render(), "at::cpu::addmv_out(out,self,mat,vec,beta,alpha)");
}

#[test]
fn unstructured_out_call_puts_output_last() {
    let index = DispatchIndex::new("CPU");
    let call = out_variant_call(&addmv(false), &index).unwrap();
    assert_eq!(call.render(), "at::native::addmv_out(self,mat,vec,beta,alpha,out)");
}

#[test]
fn unstructured_out_call_rejects_multiple_outputs() {
    let index = DispatchIndex::new("CPU");
    let g = OutGroup::new(
        schema("kthvalue(Tensor self, int k, int dim=-1, bool keepdim=False) -> (Tensor values, Tensor indices)"),
        schema("kthvalue.values(Tensor self, int k, int dim=-1, bool keepdim=False, *, Tensor(a!) values, Tensor(b!) indices) -> (Tensor(a!) values, Tensor(b!) indices)"),
        false,
    );
    let err = out_variant_call(&g, &index).unwrap_err();
    assert_eq!(err.kind, GenErrorKind::Internal);
}

#[test]
fn backend_kernels_only_apply_to_unstructured_groups() {
    let mut index = DispatchIndex::new("CPU");
    index.insert(OperatorName::new("addmv", ""), "addmv_impl");
    index.insert(OperatorName::new("addmv", "out"), "addmv_out_impl");

    let g = addmv(false);
    assert_eq!(get_kernel_name(&g, &index), "addmv_impl");
    assert_eq!(get_out_kernel_name(&g, &index).unwrap(), "addmv_out_impl");
    assert_eq!(
        generate_non_out_variant_call(&g, &index).unwrap(),
        "at::native::addmv_impl(self,mat,vec,beta,alpha)"
    );

    let g = addmv(true);
    assert_eq!(get_kernel_name(&g, &index), "addmv");
    assert_eq!(
        generate_non_out_variant_call(&g, &index).unwrap(),
        "at::cpu::addmv(self,mat,vec,beta,alpha)"
    );
}

#[test]
fn view_calls_use_native_namespace() {
    let mut index = DispatchIndex::new("CPU");
    let g = ViewGroup::new(schema("view_as_real(Tensor(a) self) -> Tensor(a)"));
    assert_eq!(generate_call_to_view_ops(&g, &index), "at::native::view_as_real(self)");

    index.insert(OperatorName::new("view_as_real", ""), "view_as_real_cpu");
    assert_eq!(
        generate_call_to_view_ops(&g, &index),
        "at::native::view_as_real_cpu(self)"
    );
}

#[test]
fn missing_out_schema_is_internal_error() {
    let index = DispatchIndex::new("CPU");
    let g = OutGroup {
        functional: schema("relu(Tensor self) -> Tensor"),
        out: None,
        structured: true,
    };
    assert_eq!(
        generate_out_variant_call(&g, &index).unwrap_err().kind,
        GenErrorKind::Internal
    );
}
