use std::process::ExitCode;

use scent_saju::config::Config;
use scent_saju::perfume::Catalog;
use scent_saju::ui;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("오류: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let catalog = Catalog::load(config.catalog_path())?;
    scent_saju::app_log!(
        "[시작] 카탈로그 {} ({}종), 추천 로그 {}",
        config.catalog_path().display(),
        catalog.len(),
        config.log_path().display(),
    );

    ui::run(&config, catalog)?;
    Ok(())
}
