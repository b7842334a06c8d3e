#![cfg(test)]

use srgen::{
    catalog::{Catalog, CatalogEntry},
    config::GenConfig,
    driver::{Driver, GeneratedFiles},
};

#[allow(dead_code)]
pub fn enable_debug_logs() {
    fern::Dispatch::new()
        .level(log::LevelFilter::Debug)
        .chain(std::io::stderr())
        .apply()
        .unwrap();
}

/// A small catalog covering a structured op with two type variants, an
/// unstructured op with a backend binding, a view and several rejects.
pub fn sample_catalog() -> Catalog {
    Catalog::from_json(SAMPLE_CATALOG).expect("sample catalog should load")
}

pub const SAMPLE_CATALOG: &str = r#"[
    {"func": "isin.Tensor_Tensor(Tensor elements, Tensor test_elements, *, bool assume_unique=False, bool invert=False) -> Tensor", "structured": true},
    {"func": "isin.Tensor_Tensor_out(Tensor elements, Tensor test_elements, *, bool assume_unique=False, bool invert=False, Tensor(a!) out) -> Tensor(a!)", "structured": true},
    {"func": "gcd(Tensor self, Tensor other) -> Tensor"},
    {"func": "gcd_(Tensor(a!) self, Tensor other) -> Tensor(a!)"},
    {"func": "gcd.out(Tensor self, Tensor other, *, Tensor(a!) out) -> Tensor(a!)", "dispatch": {"CPU": "gcd_out_cpu"}},
    {"func": "view_as_real(Tensor(a) self) -> Tensor(a)"},
    {"func": "isin.Scalar_Tensor(Scalar element, Tensor test_elements, *, bool assume_unique=False, bool invert=False) -> Tensor", "structured": true},
    {"func": "isin.Scalar_Tensor_out(Scalar element, Tensor test_elements, *, bool assume_unique=False, bool invert=False, Tensor(a!) out) -> Tensor(a!)", "structured": true},
    {"func": "cholesky(Tensor self, bool upper=False) -> Tensor"},
    {"func": "cholesky.out(Tensor self, bool upper=False, *, Tensor(a!) out) -> Tensor(a!)"},
    {"func": "amax(Tensor self, int[1] dim=[], bool keepdim=False) -> Tensor", "structured": true},
    {"func": "amax.out(Tensor self, int[1] dim=[], bool keepdim=False, *, Tensor(a!) out) -> Tensor(a!)", "structured": true},
    {"func": "add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor", "structured": true},
    {"func": "add.out(Tensor self, Tensor other, *, Scalar alpha=1, Tensor(a!) out) -> Tensor(a!)", "structured": true}
]"#;

#[allow(dead_code)]
pub fn catalog_of(funcs: &[&str]) -> Catalog {
    Catalog::from_entries(funcs.iter().map(|f| CatalogEntry::new(*f)).collect())
        .expect("catalog should load")
}

pub fn generate(config: GenConfig, catalog: &Catalog) -> GeneratedFiles {
    let (files, errs) = Driver::new(config, "CPU").generate(catalog, false);
    assert!(errs.is_empty(), "generation should succeed: {:?}", errs);
    files
}
