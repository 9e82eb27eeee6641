use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formsync_core::model::{ErrorBody, RuleViolationBody, User, ValidationError};
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "formsyncctl", version, about = "CLI for the formsync demo server")]
struct Args {
    /// Server base URL, e.g. http://127.0.0.1:3000
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// User CRUD operations.
    Users {
        #[command(subcommand)]
        users: UserCmd,
    },
    /// One-shot validation of a JSON value against a model.
    Validate {
        #[arg(long)]
        model: String,
        /// Language tag for the error descriptions (empty = default).
        #[arg(long, default_value = "")]
        lang: String,
        /// Candidate value as inline JSON.
        json: String,
    },
}

#[derive(Subcommand, Debug)]
enum UserCmd {
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        age: i64,
        /// May be passed multiple times.
        #[arg(long = "interest")]
        interests: Vec<String>,
    },
    List,
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = reqwest::Client::new();
    let base = args.server.trim_end_matches('/').to_string();

    match args.cmd {
        Cmd::Users { users } => match users {
            UserCmd::Create {
                username,
                email,
                age,
                interests,
            } => {
                let body = serde_json::json!({
                    "username": username,
                    "email": email,
                    "age": age,
                    "interests": interests,
                });
                let resp = client
                    .post(format!("{base}/users"))
                    .json(&body)
                    .send()
                    .await
                    .context("create request")?;
                if resp.status() == StatusCode::BAD_REQUEST {
                    let violations: RuleViolationBody =
                        resp.json().await.context("violation body decode")?;
                    println!("{}", serde_json::to_string_pretty(&violations)?);
                    anyhow::bail!("user rejected by validation");
                }
                resp.error_for_status().context("create status")?;
                println!("created");
            }
            UserCmd::List => {
                let users: Vec<User> = client
                    .get(format!("{base}/users"))
                    .send()
                    .await
                    .context("list request")?
                    .error_for_status()?
                    .json()
                    .await
                    .context("list decode")?;
                println!("{}", serde_json::to_string_pretty(&users)?);
            }
            UserCmd::Delete { id } => {
                client
                    .delete(format!("{base}/users/{id}"))
                    .send()
                    .await
                    .context("delete request")?
                    .error_for_status()
                    .context("delete status")?;
                println!("deleted");
            }
        },
        Cmd::Validate { model, lang, json } => {
            let value: Value = serde_json::from_str(&json).context("parse json")?;
            let mut req = client
                .post(format!("{base}/validate/{model}"))
                .json(&value);
            if !lang.is_empty() {
                req = req.query(&[("lang", lang.as_str())]);
            }
            let resp = req.send().await.context("validate request")?;
            if resp.status() == StatusCode::BAD_REQUEST {
                let body: ErrorBody = resp.json().await.context("error body decode")?;
                anyhow::bail!("{}", body.error);
            }
            let errors: Vec<ValidationError> = resp
                .error_for_status()
                .context("validate status")?
                .json()
                .await
                .context("validate decode")?;
            println!("{}", serde_json::to_string_pretty(&errors)?);
        }
    }

    Ok(())
}
