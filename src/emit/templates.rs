//! Text templates for the generated sources. Every function here takes
//! fully-resolved strings and only lays them out.

pub struct OutVariantClosure<'a> {
    pub schema: &'a str,
    pub arg_extraction: &'a str,
    pub functional_call: &'a str,
    pub out_name: &'a str,
    pub resize_output: bool,
    pub out_call: &'a str,
}

pub fn out_variant_closure(c: &OutVariantClosure) -> String {
    let resize = if c.resize_output {
        format!("          fastResizeToZero({});\n", c.out_name)
    } else {
        String::new()
    };
    format!(
        r#"
      if (n->matches(torch::schema("aten::{schema}"))) {{
        return [](ProcessedNode* p_node) {{
          {arg_extraction}
          if (p_node->Output(0).isNone()) {{
            p_node->Output(0) = {functional_call};
            return;
          }}
          auto& {out_name} = p_node->Output(0).toTensor();
{resize}          {out_call};
        }};
      }}"#,
        schema = c.schema,
        arg_extraction = c.arg_extraction,
        functional_call = c.functional_call,
        out_name = c.out_name,
        resize = resize,
        out_call = c.out_call,
    )
}

pub struct ViewClosure<'a> {
    pub schema: &'a str,
    pub arg_extraction: &'a str,
    pub view_call: &'a str,
}

pub fn view_closure(c: &ViewClosure) -> String {
    format!(
        r#"
      if (n->matches(torch::schema("aten::{schema}"))) {{
        return [](ProcessedNode* p_node) {{
          {arg_extraction}
            p_node->Output(0) = {view_call};
        }};
      }}"#,
        schema = c.schema,
        arg_extraction = c.arg_extraction,
        view_call = c.view_call,
    )
}

pub const REGISTER_OPERATOR: &str = "REGISTER_OPERATOR_FUNCTOR";
pub const REGISTER_NATIVE_OPERATOR: &str = "REGISTER_NATIVE_OPERATOR_FUNCTOR";

pub fn register_operator(macro_name: &str, op_name: &str, body: &str) -> String {
    format!(
        r#"
{macro_name}(
    aten::{op_name},
    aten_{op_name},
    [](Node* n) -> SROperator {{
      {body}
      LogAndDumpSchema(n);
      return nullptr;
    }});
"#,
        macro_name = macro_name,
        op_name = op_name,
        body = body,
    )
}

/// The literal inputs of one harness invocation.
pub struct TestRound<'a> {
    pub definitions: &'a str,
    pub names: &'a str,
}

pub struct TestCase<'a> {
    pub test_name: &'a str,
    pub arg_declarations: &'a str,
    pub op_name: &'a str,
    pub arg_names: &'a str,
    pub first: TestRound<'a>,
    /// The second round re-runs the same graph with new shapes. It is
    /// only present for out variants.
    pub second: Option<TestRound<'a>>,
    pub check_resize: bool,
}

fn test_script(c: &TestCase) -> String {
    format!(
        r#"
TEST(StaticRuntime, autogen_{test_name}) {{
  const std::string script = R"IR(
    graph({arg_declarations}):
        %bias: None = prim::Constant()
        %ret = aten::{op_name}({arg_names})
        %cloned = aten::clone(%ret, %bias)
        return (%cloned)
  )IR";
"#,
        test_name = c.test_name,
        arg_declarations = c.arg_declarations,
        op_name = c.op_name,
        arg_names = c.arg_names,
    )
}

pub fn test_case(c: &TestCase) -> String {
    let script = test_script(c);
    let second = unless!(&c.second, else {
        return format!(
            r#"{script}
  {definitions}
  std::vector<IValue> args{{{names}}};
  testStaticRuntime(script, args);
}}
"#,
            script = script,
            definitions = c.first.definitions,
            names = c.first.names,
        );
    });

    let check_resize = if c.check_resize { "true" } else { "false" };
    format!(
        r#"{script}
  {definitions}
  std::vector<IValue> args{{{names}}};
  testStaticRuntime(script, args, {{}}, /*use_allclose=*/false, /*use_equalnan=*/false, /*check_resize=*/{check_resize});

  {definitions2}
  std::vector<IValue> args2{{{names2}}};
  testStaticRuntime(script, args, args2, /*use_allclose=*/false, /*use_equalnan=*/false, /*check_resize=*/{check_resize});

}}
"#,
        script = script,
        definitions = c.first.definitions,
        names = c.first.names,
        definitions2 = second.definitions,
        names2 = second.names,
        check_resize = check_resize,
    )
}

pub fn ops_file(body: &str) -> String {
    format!(
        r#"// @lint-ignore-every CLANGTIDY HOWTOEVEN
// AUTO-GENERATED FROM: srgen
#include <torch/csrc/jit/runtime/static/ops.h>

#include <ATen/CPUFunctions.h>
#include <ATen/InferSize.h>
#include <ATen/NativeFunctions.h>
#include <ATen/Parallel.h>
#include <ATen/ScalarOps.h>
#include <ATen/TensorUtils.h>
#include <ATen/native/Resize.h>
#include <c10/core/ScalarType.h>
#include <c10/util/irange.h>
#include <torch/csrc/jit/ir/ir.h>
#include <torch/csrc/jit/runtime/static/impl.h>

namespace torch {{
namespace jit {{
{body}
}} // namespace jit
}} // namespace torch
"#,
        body = body
    )
}

pub fn tests_file(body: &str) -> String {
    format!(
        r#"// @lint-ignore-every CLANGTIDY HOWTOEVEN
// AUTO-GENERATED FROM: srgen
#include <gtest/gtest.h>
#include <torch/csrc/jit/runtime/static/impl.h>
#include <torch/torch.h>

#include "test_utils.h"

using namespace caffe2;
using namespace torch;
using namespace torch::jit;
using namespace torch::jit::test;
using c10::IValue;
{body}
"#,
        body = body
    )
}
