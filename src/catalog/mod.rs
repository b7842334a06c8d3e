//! Loading the operator catalog and pairing its schemas into groups.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::GenError,
    parse::parse_schema,
    schema::{FunctionSchema, OperatorGroup, OutGroup, ViewGroup},
};

mod backend;

pub use backend::{BackendIndex, BackendMetadata, DispatchIndex};

/// One record of the JSON catalog, as written on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub func: String,
    #[serde(default)]
    pub structured: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dispatch: BTreeMap<String, String>,
}

impl CatalogEntry {
    pub fn new<S: ToString>(func: S) -> CatalogEntry {
        CatalogEntry {
            func: func.to_string(),
            ..Default::default()
        }
    }

    pub fn structured(mut self) -> CatalogEntry {
        self.structured = true;
        self
    }

    pub fn dispatch<K: ToString, V: ToString>(mut self, key: K, kernel: V) -> CatalogEntry {
        self.dispatch.insert(key.to_string(), kernel.to_string());
        self
    }
}

/// A parsed catalog record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeFunction {
    pub func: FunctionSchema,
    pub structured: bool,
    pub dispatch: BTreeMap<String, String>,
}

impl NativeFunction {
    /// The kernel registered for `dispatch_key`. A table key may list
    /// several dispatch keys separated by commas.
    pub fn kernel_for(&self, dispatch_key: &str) -> Option<&str> {
        self.dispatch
            .iter()
            .find(|(keys, _)| keys.split(',').any(|k| k.trim() == dispatch_key))
            .map(|(_, kernel)| kernel.as_str())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub functions: Vec<NativeFunction>,
}

enum Slot {
    View(usize),
    Bucket(usize),
}

#[derive(Default)]
struct Bucket<'a> {
    functional: Option<&'a NativeFunction>,
    out: Option<&'a NativeFunction>,
}

impl Catalog {
    /// Parses every entry, reporting all malformed schemas at once.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Catalog, Vec<GenError>> {
        let mut functions = Vec::with_capacity(entries.len());
        let mut errors = vec![];
        for (idx, entry) in entries.into_iter().enumerate() {
            match parse_schema(&entry.func) {
                Ok(func) => functions.push(NativeFunction {
                    func,
                    structured: entry.structured,
                    dispatch: entry.dispatch,
                }),
                Err(mut err) => {
                    err.src = err
                        .src
                        .map(|src| src.with_origin(format!("catalog entry #{}", idx)));
                    errors.push(err);
                }
            }
        }

        if errors.is_empty() {
            log::debug!("loaded {} catalog entries", functions.len());
            Ok(Catalog { functions })
        } else {
            Err(errors)
        }
    }

    pub fn from_json(text: &str) -> Result<Catalog, Vec<GenError>> {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(text).map_err(|err| vec![GenError::from(err)])?;
        Catalog::from_entries(entries)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Catalog, Vec<GenError>> {
        let path = path.as_ref();
        log::info!("reading catalog from {}", path.display());
        let text = fs::read_to_string(path).map_err(|err| {
            vec![GenError::from(err).with_context(path.display())]
        })?;
        Catalog::from_json(&text)
    }

    pub fn backend_index(&self, dispatch_key: &str) -> DispatchIndex {
        let mut index = DispatchIndex::new(dispatch_key);
        for f in self.functions.iter() {
            if let Some(kernel) = f.kernel_for(dispatch_key) {
                index.insert(f.func.name.clone(), kernel);
            }
        }
        index
    }

    /// Pairs the catalog's schemas into operator groups, in order of first
    /// appearance. Views form their own groups. Everything else is paired
    /// by signature into a functional schema and its optional out variant.
    /// Inplace schemas are not grouped.
    pub fn groups(&self) -> Vec<OperatorGroup> {
        let mut order = vec![];
        let mut buckets: Vec<Bucket> = vec![];
        let mut bucket_idx = HashMap::new();
        for (idx, f) in self.functions.iter().enumerate() {
            if f.func.is_view() {
                order.push(Slot::View(idx));
                continue;
            }

            if f.func.is_inplace() && !f.func.is_out_fn() {
                continue;
            }

            let key = f.func.signature_key();
            let b = *bucket_idx.entry(key).or_insert_with(|| {
                buckets.push(Bucket::default());
                order.push(Slot::Bucket(buckets.len() - 1));
                buckets.len() - 1
            });

            let slot = if f.func.is_out_fn() {
                &mut buckets[b].out
            } else {
                &mut buckets[b].functional
            };
            if let Some(existing) = *slot {
                log::warn!(
                    "`{}` has the same signature as `{}`, ignoring",
                    f.func.name,
                    existing.func.name
                );
            } else {
                *slot = Some(f);
            }
        }

        order
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::View(idx) => Some(ViewGroup::new(self.functions[idx].func.clone()).into()),
                Slot::Bucket(b) => {
                    let bucket = &buckets[b];
                    let functional = unless!(bucket.functional, else {
                        if let Some(out) = bucket.out {
                            log::debug!("`{}` has no functional variant", out.func.name);
                        }
                        return None;
                    });
                    let structured =
                        functional.structured || bucket.out.map(|o| o.structured).unwrap_or(false);
                    Some(
                        OutGroup {
                            functional: functional.func.clone(),
                            out: bucket.out.map(|o| o.func.clone()),
                            structured,
                        }
                        .into(),
                    )
                }
            })
            .collect()
    }
}
