use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::models::EngineConfig;
use crate::processors::ParallelProcessor;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::ResultFormatter;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Process {
            input_file,
            workers,
            format,
            output_file,
            use_mmap,
            name_policy,
            buffer_size,
            lookahead,
            no_progress,
        } => {
            let config = EngineConfig {
                workers,
                buffer_size,
                lookahead,
                use_mmap,
                name_policy,
            };

            // The engine blocks on file reads; keep it off the async runtime.
            let outcome = tokio::task::spawn_blocking(move || {
                let progress =
                    ProgressReporter::new(workers as u64, "Planning byte ranges...", no_progress);
                ParallelProcessor::with_config(config).process_file(&input_file, Some(&progress))
            })
            .await??;

            let formatter = ResultFormatter::new().with_format(format);
            match output_file {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    formatter.write_to(&outcome.table, &path)?;
                }
                None => println!("{}", formatter.format(&outcome.table)?),
            }

            if cli.verbose {
                eprintln!("Total stations: {}", outcome.table.len());
                eprintln!("{}", outcome.stats);
                eprintln!(
                    "Scanned {} bytes with {} workers in {:.2?}",
                    outcome.file_size,
                    outcome.ranges.len(),
                    outcome.elapsed
                );
            }
        }

        Commands::Plan {
            input_file,
            workers,
            lookahead,
        } => {
            let plan = tokio::task::spawn_blocking(move || {
                ParallelProcessor::new(workers)
                    .with_lookahead(lookahead)
                    .plan(&input_file)
            })
            .await??;

            println!("File size: {} bytes", plan.file_size);
            for (i, (nominal, aligned)) in plan.nominal.iter().zip(&plan.aligned).enumerate() {
                println!("range {:>3}: nominal {}  aligned {}", i, nominal, aligned);
            }
        }
    }

    Ok(())
}
