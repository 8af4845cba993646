use anyhow::Result;
use bit_odb::areas::repository::Repository;
use bit_odb::artifacts::objects::object_type::ObjectType;
use bit_odb::artifacts::objects::signature::Signature;
use bit_odb::commands::plumbing::cat_file::CatFileMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BIT_LOG";

#[derive(Parser)]
#[command(
    name = "bit-odb",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Inspect and tag objects in a git repository",
    long_about = "This tool reads loose objects and references of a git repository, \
    resolves object ids and reference names to objects, and creates annotated tags.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
        #[arg(long, help = "Create a repository without a working tree")]
        bare: bool,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes a file as an object of the given type and can write it to the object database. \
        It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object type")]
        kind: ObjectType,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "cat-file",
        about = "Print information about an object",
        long_about = "This command prints the type, size or content of an object, or checks that it exists. \
        The object can be named by its id or by a reference name."
    )]
    CatFile {
        #[command(flatten)]
        mode: CatFileFlags,
        #[arg(index = 1, help = "The object id or reference name")]
        identifier: String,
    },
    #[command(
        name = "rev-parse",
        about = "Print the object id an identifier resolves to",
        long_about = "This command resolves an object id or reference name and prints the object id. \
        With --type the object must be of that type."
    )]
    RevParse {
        #[arg(index = 1, help = "The object id or reference name")]
        identifier: String,
        #[arg(long = "type", help = "The type the object must have")]
        kind: Option<ObjectType>,
    },
    #[command(
        name = "tag",
        about = "List tags or create an annotated tag",
        long_about = "Without a name this command lists the tags of the repository. \
        With a name it creates an annotated tag on the target (HEAD by default), \
        using GIT_AUTHOR_NAME and GIT_AUTHOR_EMAIL as the tagger."
    )]
    Tag {
        #[arg(short, long, help = "List tags")]
        list: bool,
        #[arg(index = 1, help = "The name of the tag to create")]
        name: Option<String>,
        #[arg(index = 2, default_value = "HEAD", help = "The object to tag")]
        target: String,
        #[arg(short, long, help = "The tag message")]
        message: Option<String>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct CatFileFlags {
    #[arg(short = 't', help = "Show the object type")]
    show_type: bool,
    #[arg(short = 's', help = "Show the object size")]
    size: bool,
    #[arg(short = 'e', help = "Exit with zero status if the object exists")]
    exists: bool,
    #[arg(short = 'p', help = "Pretty-print the object content")]
    pretty: bool,
}

impl CatFileFlags {
    fn mode(&self) -> CatFileMode {
        if self.show_type {
            CatFileMode::Type
        } else if self.size {
            CatFileMode::Size
        } else if self.exists {
            CatFileMode::Exists
        } else {
            CatFileMode::Pretty
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();

    match &cli.command {
        Commands::Init { path, bare } => {
            let path = match path {
                Some(path) => path.clone(),
                None => std::env::current_dir()?,
            };

            Repository::init_repository(&path, *bare, &mut stdout)?
        }
        Commands::HashObject { write, kind, file } => {
            let repository = Repository::open(std::env::current_dir()?)?;

            repository.hash_object(file, *kind, *write, &mut stdout)?
        }
        Commands::CatFile { mode, identifier } => {
            let repository = Repository::open(std::env::current_dir()?)?;

            if !repository.cat_file(identifier, mode.mode(), &mut stdout)? {
                std::process::exit(1);
            }
        }
        Commands::RevParse { identifier, kind } => {
            let repository = Repository::open(std::env::current_dir()?)?;

            repository.rev_parse(identifier, *kind, &mut stdout)?
        }
        Commands::Tag {
            list,
            name,
            target,
            message,
        } => {
            let repository = Repository::open(std::env::current_dir()?)?;

            match name {
                Some(name) if !*list => {
                    let message = message
                        .as_deref()
                        .ok_or_else(|| anyhow::anyhow!("a tag message is required (-m)"))?;
                    let tagger = Signature::load_from_env()?;

                    repository.tag(name, target, message, &tagger, &mut stdout)?
                }
                _ => repository.list_tags(&mut stdout)?,
            }
        }
    }

    Ok(())
}
