use crate::{
    catalog::BackendIndex,
    classify::Classifier,
    config::func_name_base_str,
    errors::GenResult,
    schema::{OperatorGroup, OutGroup, ViewGroup},
    synth,
};

use super::templates::{self, OutVariantClosure, ViewClosure};

/// Emits the registration block for all type variants of one operator.
pub struct GenOpDispatcher<'a> {
    classifier: &'a Classifier<'a>,
    backend_index: &'a dyn BackendIndex,
}

impl<'a> GenOpDispatcher<'a> {
    pub fn new(classifier: &'a Classifier<'a>, backend_index: &'a dyn BackendIndex) -> Self {
        GenOpDispatcher {
            classifier,
            backend_index,
        }
    }

    /// Dispatches on the kind of the first group. An empty slice yields an
    /// empty string.
    pub fn generate(&self, groups: &[OperatorGroup]) -> GenResult<String> {
        match groups.first() {
            None => Ok(String::new()),
            Some(OperatorGroup::Out(_)) => self.out_variant(groups),
            Some(OperatorGroup::View(_)) => self.view(groups),
        }
    }

    pub fn out_variant(&self, groups: &[OperatorGroup]) -> GenResult<String> {
        let first = unless!(groups.first(), else return Ok(String::new()));
        let mut generated_type_variants = Vec::with_capacity(groups.len());
        for group in groups {
            let g = self.supported_out(group)?;
            let variant = self
                .out_variant_op_generator(g)
                .map_err(|err| err.with_context(&g.functional.name))?;
            generated_type_variants.push(variant);
        }

        let op_name = func_name_base_str(first);
        let body = generated_type_variants.join("\n");
        Ok(templates::register_operator(
            templates::REGISTER_OPERATOR,
            op_name,
            &body,
        ))
    }

    pub fn view(&self, groups: &[OperatorGroup]) -> GenResult<String> {
        let first = unless!(groups.first(), else return Ok(String::new()));
        let mut generated_type_variants = Vec::with_capacity(groups.len());
        for group in groups {
            let g = self.supported_view(group)?;
            let variant = self
                .view_op_generator(g)
                .map_err(|err| err.with_context(&g.view.name))?;
            generated_type_variants.push(variant);
        }

        let op_name = func_name_base_str(first);
        let body = generated_type_variants.join("\n");
        Ok(templates::register_operator(
            templates::REGISTER_NATIVE_OPERATOR,
            op_name,
            &body,
        ))
    }

    fn supported_out<'g>(&self, group: &'g OperatorGroup) -> GenResult<&'g OutGroup> {
        if !self.classifier.is_supported(group) {
            return Err(internal_err!("`{}` is not supported", group).with_context(group));
        }
        group
            .as_out()
            .ok_or_else(|| internal_err!("`{}` is not an out variant group", group))
    }

    fn supported_view<'g>(&self, group: &'g OperatorGroup) -> GenResult<&'g ViewGroup> {
        if !self.classifier.is_supported(group) {
            return Err(internal_err!("`{}` is not supported", group).with_context(group));
        }
        group
            .as_view()
            .ok_or_else(|| internal_err!("`{}` is not a view group", group))
    }

    pub fn out_variant_op_generator(&self, g: &OutGroup) -> GenResult<String> {
        let schema = g.functional.to_string();
        let arg_extraction = synth::generate_arg_extraction(&g.functional)?;
        let functional_call = synth::generate_non_out_variant_call(g, self.backend_index)?;
        let out = g
            .out
            .as_ref()
            .ok_or_else(|| internal_err!("`{}` has no out variant", g.functional.name))?;
        if out.arguments.out.len() != 1 {
            return Err(internal_err!(
                "`{}` must have exactly one output, found {}",
                out.name,
                out.arguments.out.len()
            ));
        }

        let out_name = &out.arguments.out[0].name;
        let out_call = synth::generate_out_variant_call(g, self.backend_index)?;
        let resize_output = self.classifier.config().should_check_resize(&g.functional);
        if !resize_output {
            log::debug!("`{}` sizes its own output, skipping resize", g.functional.name);
        }

        Ok(templates::out_variant_closure(&OutVariantClosure {
            schema: &schema,
            arg_extraction: &arg_extraction,
            functional_call: &functional_call,
            out_name,
            resize_output,
            out_call: &out_call,
        }))
    }

    pub fn view_op_generator(&self, g: &ViewGroup) -> GenResult<String> {
        let schema = g.view.to_string();
        let arg_extraction = synth::generate_arg_extraction(&g.view)?;
        let view_call = synth::generate_call_to_view_ops(g, self.backend_index);
        Ok(templates::view_closure(&ViewClosure {
            schema: &schema,
            arg_extraction: &arg_extraction,
            view_call: &view_call,
        }))
    }
}
