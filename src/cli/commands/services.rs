use clap::Subcommand;
use serde_json::json;

use crate::cli::commands::content::{apply_edits, image_urls, EditArgs};
use crate::cli::utils::{output_empty_collection, output_success, output_value};
use crate::cli::{AdminContext, OutputFormat};
use crate::content::DocumentId;
use crate::editor::{CollectionEditor, EditMode};
use crate::forms::Service;
use crate::routes::Route;

#[derive(Subcommand)]
pub enum ServiceCommands {
    #[command(about = "List services, newest first")]
    List,

    #[command(about = "Show one service")]
    Show {
        #[arg(help = "Service document id")]
        id: String,
    },

    #[command(about = "Create a service from a values file")]
    Create {
        #[command(flatten)]
        edit: EditArgs,
    },

    #[command(about = "Update a service")]
    Update {
        #[arg(help = "Service document id")]
        id: String,
        #[command(flatten)]
        edit: EditArgs,
    },

    #[command(about = "Delete a service")]
    Delete {
        #[arg(help = "Service document id")]
        id: String,
    },
}

pub async fn handle(cmd: ServiceCommands, ctx: &AdminContext) -> anyhow::Result<()> {
    let editor = CollectionEditor::<Service>::new(ctx.notifier.clone());

    match cmd {
        ServiceCommands::List => {
            ctx.enter(Route::Services(None))?;
            let services = ctx.settle(editor.list(&ctx.store).await)?;
            if services.is_empty() {
                return output_empty_collection(&ctx.output, "services", "No services yet");
            }

            match ctx.output {
                OutputFormat::Json => {
                    let rows: Vec<_> = services
                        .iter()
                        .map(|s| json!({ "id": s.id, "title": s.value.title, "link": s.value.link }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                }
                OutputFormat::Text => {
                    for service in &services {
                        println!("{}  {}  /{}", service.id, service.value.title, service.value.link);
                    }
                }
            }
            Ok(())
        }
        ServiceCommands::Show { id } => {
            ctx.enter(Route::Services(Some(id.clone())))?;
            let entry = ctx.settle(editor.require(&ctx.store, &DocumentId::new(id)).await)?;
            output_value(
                &ctx.output,
                &format!("{} ({})", entry.value.title, entry.id),
                &json!({
                    "id": entry.id,
                    "createdAt": entry.created_at,
                    "values": entry.value,
                    "imageUrls": image_urls(&entry.value, &ctx.content),
                }),
            )
        }
        ServiceCommands::Create { edit } => {
            ctx.enter(Route::Services(None))?;
            if edit.file.is_none() {
                anyhow::bail!("A new service needs --file with at least title, description, link and demands");
            }
            let value = apply_edits(&Service::default(), &edit)?;
            let saved = ctx.settle(editor.save(&ctx.store, &EditMode::Creating, &value).await)?;
            output_success(
                &ctx.output,
                &format!("Created service '{}'", saved.value.title),
                Some(json!({ "id": saved.id })),
            )
        }
        ServiceCommands::Update { id, edit } => {
            ctx.enter(Route::Services(Some(id.clone())))?;
            if edit.is_empty() {
                anyhow::bail!("Nothing to change. Pass --file, --image or --remove-image.");
            }
            let id = DocumentId::new(id);
            let current = ctx.settle(editor.require(&ctx.store, &id).await)?;
            let value = apply_edits(&current.value, &edit)?;
            let saved = ctx.settle(editor.save(&ctx.store, &EditMode::Editing(id), &value).await)?;
            output_success(
                &ctx.output,
                &format!("Updated service '{}'", saved.value.title),
                Some(json!({ "id": saved.id })),
            )
        }
        ServiceCommands::Delete { id } => {
            ctx.enter(Route::Services(Some(id.clone())))?;
            let id = DocumentId::new(id);
            ctx.settle(editor.delete(&ctx.store, &id).await)?;
            output_success(&ctx.output, &format!("Deleted service {}", id), None)
        }
    }
}
