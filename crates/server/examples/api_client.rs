//! Examples for using the Issue Relay Server API
//!
//! Run the server first, then:
//! `GITHUB_TOKEN=... cargo run -p issue-relay-server --example api_client`

use reqwest::Client;

const SERVER_URL: &str = "http://localhost:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = Client::new();

    // Example 1: Health check
    println!("1. Health Check:");
    let resp = client.get(format!("{SERVER_URL}/health")).send().await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 2: Anonymous report (lands in the moderation queue)
    println!("2. Anonymous Report:");
    let resp = client
        .post(format!("{SERVER_URL}/api/v1/issues/proxy"))
        .form(&[
            ("submit_type", "github-proxy-report"),
            ("url", "https://example.com/checkout"),
            ("problem_category", "layout_bug"),
            ("description", "Pay button is hidden behind the footer"),
            ("steps_reproduce", "1. Add an item\n2. Open the cart"),
            ("browser", "Firefox 122.0"),
            ("os", "Linux"),
        ])
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 3: Authenticated report, filed under the caller's account
    println!("3. Authenticated Report:");
    match std::env::var("GITHUB_TOKEN") {
        Ok(token) => {
            let resp = client
                .post(format!("{SERVER_URL}/api/v1/issues"))
                .bearer_auth(token)
                .form(&[
                    ("submit_type", "github-auth-report"),
                    ("url", "https://example.com/video"),
                    ("problem_category", "video_bug"),
                    ("description", "Video stays black"),
                ])
                .send()
                .await?;
            println!("Status: {}", resp.status());
            println!("Body: {}", resp.text().await?);
        }
        Err(_) => println!("Skipped: set GITHUB_TOKEN to try it"),
    }

    Ok(())
}
