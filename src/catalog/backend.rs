use std::collections::HashMap;

use crate::schema::{FunctionSchema, OperatorName};

/// The concrete kernel a backend registered for one schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendMetadata {
    pub kernel: String,
}

/// Maps a schema to the kernel symbol a backend registered for it.
pub trait BackendIndex {
    fn get_kernel(&self, schema: &FunctionSchema) -> Option<BackendMetadata>;
}

/// A backend index built from the `dispatch` tables of a catalog, for a
/// single dispatch key.
#[derive(Clone, Debug, Default)]
pub struct DispatchIndex {
    pub dispatch_key: String,
    kernels: HashMap<OperatorName, String>,
}

impl DispatchIndex {
    pub fn new<S: ToString>(dispatch_key: S) -> DispatchIndex {
        DispatchIndex {
            dispatch_key: dispatch_key.to_string(),
            kernels: HashMap::new(),
        }
    }

    pub fn insert<S: ToString>(&mut self, name: OperatorName, kernel: S) {
        self.kernels.insert(name, kernel.to_string());
    }

    pub(crate) fn len(&self) -> usize {
        self.kernels.len()
    }
}

impl BackendIndex for DispatchIndex {
    fn get_kernel(&self, schema: &FunctionSchema) -> Option<BackendMetadata> {
        self.kernels.get(&schema.name).map(|kernel| BackendMetadata {
            kernel: kernel.clone(),
        })
    }
}
