use std::time::Instant;

use crate::driver::{Driver, GenerateOptions};

use super::{load_catalog, load_config};

pub(super) fn action(options: GenerateOptions) -> bool {
    let start_time = Instant::now();
    let config = match load_config(options.config_path.as_deref()) {
        Ok(config) => config,
        Err(errs) => {
            errs.into_iter().for_each(|err| err.emit());
            return false;
        }
    };

    let mut driver = Driver::new(config, &options.dispatch_key);
    let catalog = match load_catalog(&options.catalog_path) {
        Ok(catalog) => catalog,
        Err(errs) => {
            driver.emit_errors(errs);
            log::error!("{} errors emitted", driver.errors_emitted);
            return false;
        }
    };

    let (files, mut errs) = driver.generate(&catalog, options.skip_tests);
    if let Err(err) = files.write_to(&options.output_dir, &options.ops_file, &options.tests_file) {
        errs.push(err);
    }

    if !errs.is_empty() {
        driver.emit_errors(errs);
        log::error!("{} errors emitted", driver.errors_emitted);
        return false;
    }

    let elapsed = start_time.elapsed();
    log::info!("Generated in {:?}", elapsed);
    true
}
