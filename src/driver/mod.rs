use std::{
    fs,
    path::{Path, PathBuf},
};

use itertools::Itertools;

use crate::{
    catalog::{BackendIndex, Catalog},
    classify::{Classifier, Eligibility},
    config::{func_name_base_str, GenConfig},
    emit::{templates, GenOpDispatcher, GenOpTestCase},
    errors::{GenError, GenResult},
    schema::OperatorGroup,
};

mod options;

pub use options::{ClassifyOptions, GenerateOptions};

/// The two generated sources. `tests` is absent when test generation was
/// skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub ops: String,
    pub tests: Option<String>,
}

impl GeneratedFiles {
    /// Writes both sources into `dir`, creating it if needed, and returns
    /// the paths written.
    pub fn write_to<P: AsRef<Path>>(
        &self,
        dir: P,
        ops_name: &str,
        tests_name: &str,
    ) -> GenResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|err| GenError::from(err).with_context(dir.display()))?;
        }

        let mut written = vec![];
        let files = [(ops_name, Some(&self.ops)), (tests_name, self.tests.as_ref())];
        for (name, contents) in files.iter() {
            let contents = unless!(contents, else continue);
            let path = dir.join(name);
            log::info!("writing to {}", path.display());
            fs::write(&path, contents).map_err(|err| GenError::from(err).with_context(path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Splits eligible groups into buckets of one operator name each. Out
/// groups come first, then views; within a kind the buckets are sorted by
/// name and keep catalog order inside a bucket.
pub fn bucket_groups(groups: Vec<OperatorGroup>) -> Vec<Vec<OperatorGroup>> {
    let (mut outs, mut views): (Vec<_>, Vec<_>) = groups
        .into_iter()
        .partition(|g| matches!(g, OperatorGroup::Out(_)));

    let mut buckets = vec![];
    for groups in [&mut outs, &mut views].iter_mut() {
        // group_by only merges neighbours, so each name must be contiguous
        groups.sort_by(|a, b| func_name_base_str(a).cmp(func_name_base_str(b)));
        for (_, bucket) in &groups.drain(..).group_by(|g| func_name_base_str(g).to_string()) {
            buckets.push(bucket.collect());
        }
    }
    buckets
}

#[derive(Debug)]
pub struct Driver {
    config: GenConfig,
    dispatch_key: String,
    pub errors_emitted: usize,
}

impl Driver {
    pub fn new<S: ToString>(config: GenConfig, dispatch_key: S) -> Driver {
        Driver {
            config,
            dispatch_key: dispatch_key.to_string(),
            errors_emitted: 0,
        }
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    pub fn emit_errors(&mut self, errs: Vec<GenError>) {
        for err in errs {
            err.emit();
            self.errors_emitted += 1;
        }
    }

    /// Classifies every group of `catalog`, labelled as it is displayed.
    pub fn classify(&self, catalog: &Catalog) -> Vec<(String, Eligibility)> {
        let classifier = Classifier::new(&self.config);
        catalog
            .groups()
            .iter()
            .map(|g| (g.to_string(), classifier.classify(g)))
            .collect()
    }

    /// Generates the dispatch registrations and, unless `skip_tests` is
    /// set, their tests. A failing bucket does not stop the others: the
    /// files hold every bucket that succeeded and the errors are returned
    /// alongside them.
    pub fn generate(&self, catalog: &Catalog, skip_tests: bool) -> (GeneratedFiles, Vec<GenError>) {
        let classifier = Classifier::new(&self.config);
        let backend_index = catalog.backend_index(&self.dispatch_key);
        log::debug!(
            "{} kernel bindings for dispatch key {}",
            backend_index.len(),
            self.dispatch_key
        );

        let groups = catalog.groups();
        let total = groups.len();
        let eligible = groups
            .into_iter()
            .filter(|g| classifier.is_supported(g))
            .collect::<Vec<_>>();
        log::info!("{} of {} operator groups are eligible", eligible.len(), total);

        self.generate_buckets(bucket_groups(eligible), &classifier, &backend_index, skip_tests)
    }

    fn generate_buckets(
        &self,
        buckets: Vec<Vec<OperatorGroup>>,
        classifier: &Classifier,
        backend_index: &dyn BackendIndex,
        skip_tests: bool,
    ) -> (GeneratedFiles, Vec<GenError>) {
        let dispatcher = GenOpDispatcher::new(classifier, backend_index);
        let test_case = GenOpTestCase::new(classifier);
        let mut ops = vec![];
        let mut tests = vec![];
        let mut errs = vec![];
        for bucket in buckets {
            let op_name = unless!(bucket.first(), else continue);
            let op_name = func_name_base_str(op_name).to_string();
            log::debug!("generating {} type variant(s) of {}", bucket.len(), op_name);
            match dispatcher.generate(&bucket) {
                Ok(text) => ops.push(text),
                Err(err) => {
                    errs.push(err.with_context(&op_name));
                    continue;
                }
            }

            if skip_tests {
                continue;
            }

            match test_case.generate(&bucket) {
                Ok(text) => tests.push(text),
                Err(err) => errs.push(err.with_context(&op_name)),
            }
        }

        let files = GeneratedFiles {
            ops: templates::ops_file(&ops.join("\n")),
            tests: if skip_tests {
                None
            } else {
                Some(templates::tests_file(&tests.join("\n")))
            },
        };
        (files, errs)
    }
}
