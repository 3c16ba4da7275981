use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle};
use gaselect::errors::SelectorError;
use gaselect::param::{self, General, Param};
use gaselect::report::{write_logbook_csv, LogReporter, Reporter};
use log::{error, info};
use std::env;
use std::process;

fn init_logger(general: &General) -> Result<LoggerHandle, flexi_logger::FlexiLoggerError> {
    let logger = Logger::try_with_str(&general.log_level)?;
    if general.log_base.is_empty() {
        logger.start()
    } else {
        logger
            .log_to_file(FileSpec::default().basename(&general.log_base).suffix(&general.log_suffix))
            .duplicate_to_stderr(Duplicate::Info)
            .start()
    }
}

fn run(param: &Param) -> Result<(), SelectorError> {
    let experiment = gaselect::run(param)?;

    LogReporter::new(param.general.n_model_to_display).report(&experiment.hall_of_fame, &experiment.logbook);
    info!("{}", experiment);

    if !param.general.save_exp.is_empty() {
        experiment.save_auto(&param.general.save_exp)?;
    }
    if !param.general.save_logbook.is_empty() {
        write_logbook_csv(&experiment.logbook, &param.general.save_logbook)?;
        info!("Logbook saved to {}", param.general.save_logbook);
    }
    Ok(())
}

fn main() {
    let param_path = env::args().nth(1).unwrap_or_else(|| "param.yaml".to_string());

    let param = match param::get(param_path.clone()) {
        Ok(param) => param,
        Err(e) => {
            eprintln!("Cannot load parameters from {}: {}", param_path, e);
            process::exit(1);
        }
    };

    let _logger = match init_logger(&param.general) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Cannot start logger: {}", e);
            process::exit(1);
        }
    };

    info!("gaselect {} - parameters from {}", gaselect::experiment::version(), param_path);

    if let Err(e) = run(&param) {
        error!("{}", e);
        process::exit(1);
    }
}
