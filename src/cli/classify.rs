use std::time::Instant;

use crate::driver::{ClassifyOptions, Driver};

use super::{load_catalog, load_config};

pub(super) fn action(options: ClassifyOptions) -> bool {
    let start_time = Instant::now();
    let catalog = load_config(options.config_path.as_deref()).and_then(|config| {
        let catalog = load_catalog(&options.catalog_path)?;
        Ok((config, catalog))
    });

    let (config, catalog) = match catalog {
        Ok(loaded) => loaded,
        Err(errs) => {
            errs.into_iter().for_each(|err| err.emit());
            return false;
        }
    };

    let driver = Driver::new(config, "CPU");
    let report = driver.classify(&catalog);
    let accepted = report.iter().filter(|(_, e)| e.is_accepted()).count();
    for (label, eligibility) in report.iter() {
        match eligibility.reason() {
            Some(reason) => println!("rejected {}: {}", label, reason),
            None if !options.rejected => println!("accepted {}", label),
            None => (),
        }
    }

    log::info!("{} of {} operator groups accepted", accepted, report.len());
    log::info!("Classified in {:?}", start_time.elapsed());
    true
}
