//! Server status command

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

use crate::client::{ApiClient, StatusResponse};
use crate::output::{availability_marker, print_info, OutputFormat};

/// Row for the model availability table
#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Fetch and display server status with per-model availability
pub async fn show_status(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let status: StatusResponse = client.get("").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Table => {
            print_info(&format!("Server status: {}", status.status));

            let rows = vec![
                ModelRow {
                    model: "diabetes".to_string(),
                    status: availability_marker(status.models.diabetes),
                },
                ModelRow {
                    model: "heart".to_string(),
                    status: availability_marker(status.models.heart),
                },
                ModelRow {
                    model: "parkinsons".to_string(),
                    status: availability_marker(status.models.parkinsons),
                },
                ModelRow {
                    model: "autism".to_string(),
                    status: availability_marker(status.models.autism),
                },
            ];
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
