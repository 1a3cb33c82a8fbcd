use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::utils::{output_success, output_value};
use crate::cli::AdminContext;
use crate::config::ContentConfig;
use crate::content::{DocumentId, ImageField, LocalImage};
use crate::editor::{EditMode, SingletonEditor};
use crate::forms::{Banner, ContentEntity, EntityKind, Faq, OurStory, RealWinners, Setting, UnitedVoices, WayCards};

#[derive(Subcommand)]
pub enum ContentCommands {
    #[command(about = "Show the stored values of a section")]
    Show {
        #[arg(help = "Section: banner, our-story, united-voices, real-winners, faqs, way-cards, settings")]
        kind: EntityKind,
    },

    #[command(about = "Edit a section and save it")]
    Edit {
        #[arg(help = "Section: banner, our-story, united-voices, real-winners, faqs, way-cards, settings")]
        kind: EntityKind,
        #[command(flatten)]
        edit: EditArgs,
    },
}

/// Changes to apply on top of the stored values
#[derive(Args, Debug, Default, Clone)]
pub struct EditArgs {
    #[arg(long, help = "JSON or YAML file with the fields to change")]
    pub file: Option<PathBuf>,

    #[arg(long = "image", value_name = "FIELD=PATH", help = "Upload a local image into an image field")]
    pub images: Vec<String>,

    #[arg(long = "remove-image", value_name = "FIELD", help = "Clear an image field")]
    pub remove_images: Vec<String>,
}

impl EditArgs {
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.images.is_empty() && self.remove_images.is_empty()
    }
}

#[derive(Serialize)]
struct SectionView<'a, E> {
    id: Option<&'a DocumentId>,
    values: &'a E,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    image_urls: BTreeMap<&'static str, String>,
}

pub async fn handle(cmd: ContentCommands, ctx: &AdminContext) -> anyhow::Result<()> {
    match cmd {
        ContentCommands::Show { kind } => {
            ctx.enter(kind.route())?;
            match kind {
                EntityKind::Banner => show::<Banner>(ctx).await,
                EntityKind::OurStory => show::<OurStory>(ctx).await,
                EntityKind::UnitedVoices => show::<UnitedVoices>(ctx).await,
                EntityKind::RealWinners => show::<RealWinners>(ctx).await,
                EntityKind::Faq => show::<Faq>(ctx).await,
                EntityKind::WayCards => show::<WayCards>(ctx).await,
                EntityKind::Setting => show::<Setting>(ctx).await,
                EntityKind::Services | EntityKind::Contact => not_a_section(kind),
            }
        }
        ContentCommands::Edit { kind, edit } => {
            ctx.enter(kind.route())?;
            match kind {
                EntityKind::Banner => edit_section::<Banner>(ctx, &edit).await,
                EntityKind::OurStory => edit_section::<OurStory>(ctx, &edit).await,
                EntityKind::UnitedVoices => edit_section::<UnitedVoices>(ctx, &edit).await,
                EntityKind::RealWinners => edit_section::<RealWinners>(ctx, &edit).await,
                EntityKind::Faq => edit_section::<Faq>(ctx, &edit).await,
                EntityKind::WayCards => edit_section::<WayCards>(ctx, &edit).await,
                EntityKind::Setting => edit_section::<Setting>(ctx, &edit).await,
                EntityKind::Services | EntityKind::Contact => not_a_section(kind),
            }
        }
    }
}

fn not_a_section(kind: EntityKind) -> anyhow::Result<()> {
    anyhow::bail!("'{}' holds many documents; use `fu-admin {}` instead", kind, kind.slug())
}

pub(crate) async fn show<E: ContentEntity>(ctx: &AdminContext) -> anyhow::Result<()> {
    let editor = ctx.settle(SingletonEditor::<E>::mount(&ctx.store, ctx.notifier.clone()).await)?;
    let heading = match editor.mode() {
        EditMode::Creating => format!("{} (not created yet)", E::LABEL),
        EditMode::Editing(id) => format!("{} ({})", E::LABEL, id),
    };
    output_value(
        &ctx.output,
        &heading,
        &SectionView {
            id: editor.mode().id(),
            values: editor.values(),
            image_urls: image_urls(editor.values(), &ctx.content),
        },
    )
}

async fn edit_section<E: ContentEntity>(ctx: &AdminContext, edit: &EditArgs) -> anyhow::Result<()> {
    if edit.is_empty() {
        anyhow::bail!("Nothing to change. Pass --file, --image or --remove-image.");
    }

    let mut editor = ctx.settle(SingletonEditor::<E>::mount(&ctx.store, ctx.notifier.clone()).await)?;
    let updated = apply_edits(editor.values(), edit)?;
    editor.set_values(updated);
    ctx.settle(editor.submit(&ctx.store).await.map(|_| ()))?;

    let id = editor.mode().id().map(|id| id.to_string()).unwrap_or_default();
    output_success(
        &ctx.output,
        &format!("{} saved", E::LABEL),
        Some(serde_json::json!({ "id": id })),
    )
}

/// Merges a values file over `current`, then applies image picks and removals
pub fn apply_edits<E: ContentEntity>(current: &E, edit: &EditArgs) -> anyhow::Result<E> {
    let mut value = match &edit.file {
        Some(path) => {
            let mut fields = current.to_fields()?;
            match read_values_file(path)? {
                Value::Object(changes) => fields.extend(changes),
                _ => anyhow::bail!("{} must contain an object of fields", path.display()),
            }
            serde_json::from_value::<E>(Value::Object(fields))?
        }
        None => current.clone(),
    };

    for pick in &edit.images {
        let (field, path) = pick
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("--image expects FIELD=PATH, got '{}'", pick))?;
        let image = LocalImage::from_path(Path::new(path))?;
        *image_slot(&mut value, field)? = ImageField::PendingUpload(image);
    }
    for field in &edit.remove_images {
        *image_slot(&mut value, field)? = ImageField::Empty;
    }

    Ok(value)
}

fn read_values_file(path: &Path) -> anyhow::Result<Value> {
    let content = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

fn image_slot<'a, E: ContentEntity>(value: &'a mut E, name: &str) -> anyhow::Result<&'a mut ImageField> {
    let fields = value.image_fields();
    let known: Vec<&'static str> = fields.iter().map(|(n, _)| *n).collect();
    match fields.into_iter().find(|(n, _)| *n == name) {
        Some((_, field)) => Ok(field),
        None if known.is_empty() => anyhow::bail!("{} has no image fields", E::LABEL),
        None => anyhow::bail!("Unknown image field '{}' (expected one of: {})", name, known.join(", ")),
    }
}

/// CDN URLs of persisted images, keyed by field name
pub(crate) fn image_urls<E: ContentEntity>(value: &E, content: &ContentConfig) -> BTreeMap<&'static str, String> {
    let mut copy = value.clone();
    copy.image_fields()
        .into_iter()
        .filter_map(|(name, field)| {
            field
                .reference()
                .and_then(|r| r.cdn_url(&content.project_id, &content.dataset))
                .map(|url| (name, url))
        })
        .collect()
}
