use clap::Subcommand;
use serde_json::json;
use std::path::PathBuf;

use crate::cli::commands::content::{apply_edits, EditArgs};
use crate::cli::utils::{output_empty_collection, output_success, output_value};
use crate::cli::{AdminContext, OutputFormat};
use crate::content::DocumentId;
use crate::editor::{CollectionEditor, EditMode};
use crate::forms::Contact;
use crate::routes::Route;

#[derive(Subcommand)]
pub enum ContactCommands {
    #[command(about = "List submissions, newest first")]
    List,

    #[command(about = "Show one submission")]
    Show {
        #[arg(help = "Contact document id")]
        id: String,
    },

    #[command(about = "Correct a submission")]
    Update {
        #[arg(help = "Contact document id")]
        id: String,
        #[arg(long, help = "JSON or YAML file with the fields to change")]
        file: PathBuf,
    },

    #[command(about = "Delete a submission")]
    Delete {
        #[arg(help = "Contact document id")]
        id: String,
    },
}

pub async fn handle(cmd: ContactCommands, ctx: &AdminContext) -> anyhow::Result<()> {
    ctx.enter(Route::Contacts)?;
    let editor = CollectionEditor::<Contact>::new(ctx.notifier.clone());

    match cmd {
        ContactCommands::List => {
            let contacts = ctx.settle(editor.list(&ctx.store).await)?;
            if contacts.is_empty() {
                return output_empty_collection(&ctx.output, "contacts", "No contact submissions");
            }

            match ctx.output {
                OutputFormat::Json => {
                    let rows: Vec<_> = contacts
                        .iter()
                        .map(|c| json!({ "id": c.id, "createdAt": c.created_at, "contact": c.value }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                }
                OutputFormat::Text => {
                    for entry in &contacts {
                        let received = entry
                            .created_at
                            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_default();
                        println!(
                            "{}  {:<16}  {:<24}  {}",
                            entry.id,
                            received,
                            entry.value.full_name(),
                            entry.value.email
                        );
                    }
                }
            }
            Ok(())
        }
        ContactCommands::Show { id } => {
            let entry = ctx.settle(editor.require(&ctx.store, &DocumentId::new(id)).await)?;
            output_value(&ctx.output, &entry.value.full_name(), &entry.value)
        }
        ContactCommands::Update { id, file } => {
            let id = DocumentId::new(id);
            let current = ctx.settle(editor.require(&ctx.store, &id).await)?;
            let edit = EditArgs {
                file: Some(file),
                ..Default::default()
            };
            let value = apply_edits(&current.value, &edit)?;
            ctx.settle(editor.save(&ctx.store, &EditMode::Editing(id.clone()), &value).await)?;
            output_success(&ctx.output, &format!("Updated contact {}", id), None)
        }
        ContactCommands::Delete { id } => {
            let id = DocumentId::new(id);
            ctx.settle(editor.delete(&ctx.store, &id).await)?;
            output_success(&ctx.output, &format!("Deleted contact {}", id), None)
        }
    }
}
