use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use pfind::cli::Cli;
use pfind::finder::{Finder, OsFileSystem, StdoutReporter};
use pfind::{FindError, SearchOutcome};

fn main() -> ExitCode {
    // 解析命令行参数
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help / --version 不算失败
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // 初始化日志
    env_logger::Builder::new()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    match run(&cli) {
        Ok(outcome) if outcome.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            // 根目录不可搜索时，权限不足行已经输出过了
            if !matches!(
                err.downcast_ref::<FindError>(),
                Some(FindError::RootNotSearchable(_))
            ) {
                error!("{err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<SearchOutcome> {
    cli.validate().context("invalid arguments")?;

    info!("开始运行 pfind");
    let start_time = Instant::now();

    let finder = Finder::new(cli.build_options(), &cli.term)?;
    let outcome = finder.find(&cli.root, &OsFileSystem, &StdoutReporter::new())?;

    let elapsed = start_time.elapsed();
    info!("搜索完成，耗时 {:.2?}", elapsed);

    Ok(outcome)
}
