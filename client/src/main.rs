use anime_client::{submit, ui, ApiClient, Submission, DEFAULT_API_BASE_URL};
use std::io;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let base_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("API_BASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let client = ApiClient::new(&base_url);

    let mut out = io::stdout();
    ui::header(&mut out)?;

    if !client.check_health().await {
        ui::offline(&mut out, client.base_url())?;
        return Ok(ExitCode::FAILURE);
    }
    ui::online(&mut out)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        ui::prompt(&mut out)?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }

        let submission = submit(&client, &line, || {
            if let Err(e) = ui::waiting(&mut io::stdout()) {
                log::warn!("Failed to draw wait indicator: {e}");
            }
        })
        .await;

        match submission {
            Submission::Answer(answer) => ui::recommendations(&mut out, &answer)?,
            Submission::Rejected(e) => ui::warning(&mut out, &e.to_string())?,
            Submission::Failed(e) => ui::error(&mut out, &e.to_string())?,
            Submission::Offline => {
                ui::offline(&mut out, client.base_url())?;
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
