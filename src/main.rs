use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tagpack::record::Rating;
use tagpack::session::{Category, Session};
use tagpack::store::Store;
use tagpack::{choices, config, export, imaging, output};

#[derive(Parser)]
#[command(name = "tagpack")]
#[command(about = "Tag images with structured metadata and pack them into an archive")]
#[command(long_about = "\
Tag images with structured metadata and pack them into an archive

Each `tag` invocation imports one image, applies the given metadata, and
saves it into the working tree. `export` zips the tree and resets it.

Working tree layout (under --root):

  export/
  ├── info.json                # metadata collection (JSON array)
  ├── images/<id>.<format>     # full-resolution saved copies
  └── thumbnails/<id>.<format> # generated thumbnails
  export.zip                   # produced by `export`

Thumbnails are 200px wide for landscape sources and 300px tall for portrait
and square sources, aspect ratio preserved.

Choice lists (`choices`) derive the distinct values seen per taxonomy field
in a previous collection, for seeding dropdowns or shell completion.

Run 'tagpack gen-config' to generate a documented tagpack.toml.")]
#[command(version)]
struct Cli {
    /// Storage root (overrides tagpack.toml's storage_root)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the empty working tree
    Init,
    /// Import an image, apply metadata, and save it into the collection
    Tag(TagArgs),
    /// List the saved records in the working collection
    List,
    /// Derive distinct per-field values from a metadata file
    Choices {
        /// Metadata file to read (defaults to the working collection)
        file: Option<PathBuf>,
    },
    /// Pack the working tree into export.zip and reset it
    Export,
    /// Print a stock tagpack.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct TagArgs {
    /// Image file to import
    image: PathBuf,

    /// Author of the image
    #[arg(long)]
    author: Option<String>,
    /// Content rating
    #[arg(long, value_parser = clap::value_parser!(Rating), default_value = "safe")]
    rating: Rating,
    /// Title
    #[arg(long)]
    title: Option<String>,
    /// Free-text comment
    #[arg(long)]
    comment: Option<String>,
    /// Id of the record this image derives from
    #[arg(long)]
    parent: Option<String>,
    /// Language of the embedded text
    #[arg(long)]
    lang: Option<String>,
    /// One line of embedded text (repeatable, in reading order)
    #[arg(long = "text-line")]
    text_lines: Vec<String>,

    /// Parody tag (repeatable)
    #[arg(long = "parody")]
    parodies: Vec<String>,
    /// Pose tag (repeatable)
    #[arg(long = "pose")]
    poses: Vec<String>,
    /// Clothing tag (repeatable)
    #[arg(long = "clothing")]
    clothes: Vec<String>,
    /// Image-level sex tag (repeatable)
    #[arg(long = "sex")]
    sexes: Vec<String>,
    /// Uncategorized tag (repeatable)
    #[arg(long = "other")]
    others: Vec<String>,
    /// Character name (repeatable)
    #[arg(long = "name")]
    names: Vec<String>,
    /// Character attribute (repeatable)
    #[arg(long = "attribute")]
    attributes: Vec<String>,
    /// Character sex, tallied per occurrence (repeatable)
    #[arg(long = "character-sex")]
    character_sexes: Vec<String>,
    /// Character race, tallied per occurrence (repeatable)
    #[arg(long = "race")]
    races: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::load_config(std::path::Path::new("."))?;
    let root = cli
        .root
        .unwrap_or_else(|| PathBuf::from(&config.storage_root));
    let store = Store::new(root);

    match cli.command {
        Command::Init => {
            store.ensure_layout()?;
            println!("Initialized working tree at {}", store.export_dir().display());
        }
        Command::Tag(args) => {
            let backend = imaging::RustBackend::new();
            let mut session = Session::new();
            session.set_thumbnail_targets(config.thumbnails.targets());
            session.load_image(&backend, &args.image).map_err(|e| {
                format!(
                    "{e} (supported formats: {})",
                    imaging::supported_input_extensions().join(", ")
                )
            })?;

            session.set_author(
                args.author
                    .as_deref()
                    .unwrap_or(config.session.default_author.as_str()),
            );
            session.set_rating(args.rating);
            if let Some(title) = &args.title {
                session.set_title(title);
            }
            if let Some(comment) = &args.comment {
                session.set_comment(comment);
            }
            if let Some(parent) = &args.parent {
                session.set_parent(parent);
            }
            if let Some(lang) = &args.lang {
                session.set_text_lang(lang);
            }
            for line in &args.text_lines {
                session.add_text_line(line);
            }

            let categories = [
                (Category::Parodies, &args.parodies),
                (Category::Poses, &args.poses),
                (Category::Clothes, &args.clothes),
                (Category::Sexes, &args.sexes),
                (Category::Others, &args.others),
                (Category::Names, &args.names),
                (Category::Attributes, &args.attributes),
                (Category::CharacterSexes, &args.character_sexes),
                (Category::Races, &args.races),
            ];
            for (category, values) in categories {
                for value in values {
                    session.add(category, value);
                }
            }

            match session.save(&store, &backend)? {
                Some(saved) => println!(
                    "{}",
                    output::format_saved(&saved.id, saved.collection_size)
                ),
                None => println!("Nothing to save."),
            }
        }
        Command::List => {
            let records = store.load_records()?;
            output::print_lines(&output::format_records(&records));
        }
        Command::Choices { file } => {
            let path = file.unwrap_or_else(|| store.metadata_path());
            let outcome = Store::import_records(&path)?;
            println!("{}", output::format_import_outcome(&outcome));
            let lists = choices::ChoiceLists::derive(&outcome.records);
            output::print_lines(&output::format_choices(&lists));
        }
        Command::Export => {
            let summary = export::export(&store)?;
            output::print_lines(&output::format_export(&summary));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
