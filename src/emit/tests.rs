#![cfg(test)]

use crate::{
    catalog::DispatchIndex,
    classify::Classifier,
    config::GenConfig,
    errors::GenErrorKind,
    parse::parse_schema,
    schema::{OperatorGroup, OperatorName, OutGroup, ViewGroup},
};

use super::{GenOpDispatcher, GenOpTestCase};

fn out_group(functional: &str, out: &str, structured: bool) -> OperatorGroup {
    OutGroup::new(
        parse_schema(functional).unwrap(),
        parse_schema(out).unwrap(),
        structured,
    )
    .into()
}

fn view_group(view: &str) -> OperatorGroup {
    ViewGroup::new(parse_schema(view).unwrap()).into()
}

fn gcd() -> OperatorGroup {
    out_group(
        "gcd(Tensor self, Tensor other) -> Tensor",
        "gcd.out(Tensor self, Tensor other, *, Tensor(a!) out) -> Tensor(a!)",
        true,
    )
}

fn isin() -> Vec<OperatorGroup> {
    vec![
        out_group(
            "isin.Tensor_Tensor(Tensor elements, Tensor test_elements, *, bool assume_unique=False, bool invert=False) -> Tensor",
            "isin.Tensor_Tensor_out(Tensor elements, Tensor test_elements, *, bool assume_unique=False, bool invert=False, Tensor(a!) out) -> Tensor(a!)",
            true,
        ),
        out_group(
            "isin.Scalar_Tensor(Scalar element, Tensor test_elements, *, bool assume_unique=False, bool invert=False) -> Tensor",
            "isin.Scalar_Tensor_out(Scalar element, Tensor test_elements, *, bool assume_unique=False, bool invert=False, Tensor(a!) out) -> Tensor(a!)",
            true,
        ),
    ]
}

#[test]
fn structured_out_variant_registration() {
    let config = GenConfig::default();
    let classifier = Classifier::new(&config);
    let index = DispatchIndex::new("CPU");
    let text = GenOpDispatcher::new(&classifier, &index)
        .generate(&[gcd()])
        .unwrap();

    let expected = concat!(
        "\n",
        "REGISTER_OPERATOR_FUNCTOR(\n",
        "    aten::gcd,\n",
        "    aten_gcd,\n",
        "    [](Node* n) -> SROperator {\n",
        "      \n",
        "      if (n->matches(torch::schema(\"aten::gcd(Tensor self, Tensor other) -> Tensor\"))) {\n",
        "        return [](ProcessedNode* p_node) {\n",
        "          const auto& self = p_node->Input(0).toTensor();\n",
        "    const auto& other = p_node->Input(1).toTensor();\n",
        "          if (p_node->Output(0).isNone()) {\n",
        "            p_node->Output(0) = at::cpu::gcd(self,other);\n",
        "            return;\n",
        "          }\n",
        "          auto& out = p_node->Output(0).toTensor();\n",
        "          fastResizeToZero(out);\n",
        "          at::cpu::gcd_out(out,self,other);\n",
        "        };\n",
        "      }\n",
        "      LogAndDumpSchema(n);\n",
        "      return nullptr;\n",
        "    });\n",
    );
    assert_eq!(text, expected);
}

#[test]
fn one_registration_per_operator_with_a_branch_per_variant() {
    let config = GenConfig::default();
    let classifier = Classifier::new(&config);
    let index = DispatchIndex::new("CPU");
    let text = GenOpDispatcher::new(&classifier, &index)
        .generate(&isin())
        .unwrap();

    assert_eq!(text.matches("REGISTER_OPERATOR_FUNCTOR(").count(), 1);
    assert_eq!(text.matches("n->matches(").count(), 2);
    assert!(text.contains("aten::isin.Tensor_Tensor(Tensor elements"));
    assert!(text.contains("aten::isin.Scalar_Tensor(Scalar element"));
    assert!(text.contains("at::cpu::isin_out(out,elements,test_elements,assume_unique,invert)"));
    // only the Tensor_Tensor variant resizes
    assert_eq!(text.matches("fastResizeToZero(out);").count(), 1);
    let tensor_tensor = text.find("isin.Tensor_Tensor").unwrap();
    let scalar_tensor = text.find("isin.Scalar_Tensor").unwrap();
    let resize = text.find("fastResizeToZero").unwrap();
    assert!(tensor_tensor < resize && resize < scalar_tensor);
}

#[test]
fn unstructured_uses_backend_kernels() {
    let config = GenConfig::default();
    let classifier = Classifier::new(&config);
    let mut index = DispatchIndex::new("CPU");
    index.insert(OperatorName::new("gcd", "out"), "gcd_out_cpu");
    let g = out_group(
        "gcd(Tensor self, Tensor other) -> Tensor",
        "gcd.out(Tensor self, Tensor other, *, Tensor(a!) out) -> Tensor(a!)",
        false,
    );
    let text = GenOpDispatcher::new(&classifier, &index)
        .generate(&[g])
        .unwrap();
    assert!(text.contains("p_node->Output(0) = at::native::gcd(self,other);"));
    assert!(text.contains("          at::native::gcd_out_cpu(self,other,out);"));
}

#[test]
fn view_registration() {
    let config = GenConfig::default();
    let classifier = Classifier::new(&config);
    let index = DispatchIndex::new("CPU");
    let g = view_group("view_as_real(Tensor(a) self) -> Tensor(a)");
    let text = GenOpDispatcher::new(&classifier, &index)
        .generate(&[g])
        .unwrap();

    let expected = concat!(
        "\n",
        "REGISTER_NATIVE_OPERATOR_FUNCTOR(\n",
        "    aten::view_as_real,\n",
        "    aten_view_as_real,\n",
        "    [](Node* n) -> SROperator {\n",
        "      \n",
        "      if (n->matches(torch::schema(\"aten::view_as_real(Tensor(a) self) -> Tensor(a)\"))) {\n",
        "        return [](ProcessedNode* p_node) {\n",
        "          const auto& self = p_node->Input(0).toTensor();\n",
        "            p_node->Output(0) = at::native::view_as_real(self);\n",
        "        };\n",
        "      }\n",
        "      LogAndDumpSchema(n);\n",
        "      return nullptr;\n",
        "    });\n",
    );
    assert_eq!(text, expected);
    assert!(!text.contains("fastResizeToZero"));
}

#[test]
fn empty_groups_emit_nothing() {
    let config = GenConfig::default();
    let classifier = Classifier::new(&config);
    let index = DispatchIndex::new("CPU");
    assert_eq!(GenOpDispatcher::new(&classifier, &index).generate(&[]).unwrap(), "");
    assert_eq!(GenOpTestCase::new(&classifier).generate(&[]).unwrap(), "");
}

#[test]
fn emission_is_deterministic() {
    let config = GenConfig::default();
    let classifier = Classifier::new(&config);
    let index = DispatchIndex::new("CPU");
    let dispatcher = GenOpDispatcher::new(&classifier, &index);
    let tests = GenOpTestCase::new(&classifier);
    assert_eq!(
        dispatcher.generate(&isin()).unwrap(),
        dispatcher.generate(&isin()).unwrap()
    );
    assert_eq!(tests.generate(&isin()).unwrap(), tests.generate(&isin()).unwrap());
}

#[test]
fn unsupported_groups_are_internal_errors() {
    let config = GenConfig::default();
    let classifier = Classifier::new(&config);
    let index = DispatchIndex::new("CPU");
    let blocked = out_group(
        "cholesky(Tensor self, bool upper=False) -> Tensor",
        "cholesky.out(Tensor self, bool upper=False, *, Tensor(a!) out) -> Tensor(a!)",
        false,
    );
    let err = GenOpDispatcher::new(&classifier, &index)
        .generate(&[blocked.clone()])
        .unwrap_err();
    assert_eq!(err.kind, GenErrorKind::Internal);
    let err = GenOpTestCase::new(&classifier)
        .generate(&[blocked])
        .unwrap_err();
    assert_eq!(err.kind, GenErrorKind::Internal);
}

#[test]
fn mixed_kinds_in_one_bucket_are_rejected() {
    let config = GenConfig::default();
    let classifier = Classifier::new(&config);
    let index = DispatchIndex::new("CPU");
    let groups = vec![gcd(), view_group("view_as_real(Tensor(a) self) -> Tensor(a)")];
    let err = GenOpDispatcher::new(&classifier, &index)
        .generate(&groups)
        .unwrap_err();
    assert_eq!(err.kind, GenErrorKind::Internal);
}

#[test]
fn out_variant_test_runs_two_rounds() {
    let config = GenConfig::default();
    let classifier = Classifier::new(&config);
    let text = GenOpTestCase::new(&classifier).generate(&[gcd()]).unwrap();

    let expected = concat!(
        "\n",
        "TEST(StaticRuntime, autogen_gcd) {\n",
        "  const std::string script = R\"IR(\n",
        "    graph(%self: Tensor, %other: Tensor):\n",
        "        %bias: None = prim::Constant()\n",
        "        %ret = aten::gcd(%self, %other)\n",
        "        %cloned = aten::clone(%ret, %bias)\n",
        "        return (%cloned)\n",
        "  )IR\";\n",
        "\n",
        "  auto self0 = at::randint(1, 100, {6,6,6}, at::kInt);\n",
        "    auto other0 = at::randint(1, 100, {6,6,6}, at::kInt);\n",
        "  std::vector<IValue> args{self0,other0};\n",
        "  testStaticRuntime(script, args, {}, /*use_allclose=*/false, /*use_equalnan=*/false, /*check_resize=*/true);\n",
        "\n",
        "  auto self1 = at::randint(1, 100, {22,22,22}, at::kInt);\n",
        "    auto other1 = at::randint(1, 100, {22,22,22}, at::kInt);\n",
        "  std::vector<IValue> args2{self1,other1};\n",
        "  testStaticRuntime(script, args, args2, /*use_allclose=*/false, /*use_equalnan=*/false, /*check_resize=*/true);\n",
        "\n",
        "}\n",
    );
    assert_eq!(text, expected);
}

#[test]
fn no_resize_variants_disable_the_resize_check() {
    let config = GenConfig::default();
    let classifier = Classifier::new(&config);
    let text = GenOpTestCase::new(&classifier).generate(&isin()).unwrap();
    assert!(text.contains("TEST(StaticRuntime, autogen_isin_Tensor_Tensor)"));
    assert!(text.contains("TEST(StaticRuntime, autogen_isin_Scalar_Tensor)"));
    assert_eq!(text.matches("/*check_resize=*/true").count(), 2);
    assert_eq!(text.matches("/*check_resize=*/false").count(), 2);
    assert!(text.contains("graph(%element: int, %test_elements: Tensor, %assume_unique: bool, %invert: bool)"));
}

#[test]
fn view_test_runs_once() {
    let config = GenConfig::default();
    let classifier = Classifier::new(&config);
    let g = view_group("view_as_real(Tensor(a) self) -> Tensor(a)");
    let text = GenOpTestCase::new(&classifier).generate(&[g]).unwrap();
    assert!(text.contains("TEST(StaticRuntime, autogen_view_as_real)"));
    assert!(text.contains("auto self0 = at::randn({6,6,6}, at::kComplexFloat);"));
    assert!(text.contains("  testStaticRuntime(script, args);\n}\n"));
    assert!(!text.contains("args2"));
}
