//! booksmith - text to HTML and EPUB converter

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use booksmith::convert::{self, ConvertOptions, CoverSource, Profile};
use booksmith::cover::PlainCover;
use booksmith::package::{EbookConvertConfig, WriterChoice};

#[derive(Parser)]
#[command(name = "booksmith")]
#[command(version, about = "Plain text and resource bundle to HTML and EPUB converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    booksmith txt2html novel.txt novel.html          One page with an inline TOC
    booksmith txt2epub novel.txt novel.epub --generate-cover
    booksmith resource2epub --resource-dir book      Bundle to output.epub")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Only report warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Report every chapter and packaging step
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Text file to a single HTML page
    #[command(name = "txt2html")]
    TxtToHtml {
        #[arg(value_name = "INPUT", default_value = "input.txt")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT", default_value = "output.html")]
        output: PathBuf,
        /// Leave out the table of contents
        #[arg(long)]
        no_toc: bool,
        /// Stylesheet to link instead of the embedded style
        #[arg(long, value_name = "PATH")]
        css: Option<PathBuf>,
    },

    /// Text file to a directory of linked HTML documents
    #[command(name = "txt2html-dir")]
    TxtToHtmlDir {
        #[arg(value_name = "INPUT", default_value = "input.txt")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT", default_value = "epub_html")]
        output: PathBuf,
        #[command(flatten)]
        book: BookArgs,
    },

    /// Text file to EPUB
    #[command(name = "txt2epub")]
    TxtToEpub {
        #[arg(value_name = "INPUT", default_value = "input.txt")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT", default_value = "output.epub")]
        output: PathBuf,
        #[command(flatten)]
        book: BookArgs,
        /// Cover image to use
        #[arg(long, value_name = "PATH", conflicts_with = "generate_cover")]
        cover: Option<PathBuf>,
        /// Generate a plain cover
        #[arg(long)]
        generate_cover: bool,
        #[command(flatten)]
        packaging: PackageArgs,
    },

    /// Resource bundle to a directory of linked HTML documents
    #[command(name = "resource2html")]
    ResourceToHtml {
        #[arg(long, value_name = "DIR", default_value = "resource")]
        resource_dir: PathBuf,
        #[arg(long, value_name = "DIR", default_value = "output_html")]
        output_dir: PathBuf,
    },

    /// Resource bundle to EPUB
    #[command(name = "resource2epub")]
    ResourceToEpub {
        #[arg(long, value_name = "DIR", default_value = "resource")]
        resource_dir: PathBuf,
        #[arg(long, value_name = "FILE", default_value = "output.epub")]
        output_file: PathBuf,
        #[command(flatten)]
        packaging: PackageArgs,
    },

    /// Rendered HTML directory to EPUB
    #[command(name = "html2epub")]
    HtmlToEpub {
        #[arg(long, value_name = "DIR", default_value = "output_html")]
        html_dir: PathBuf,
        #[arg(long, value_name = "FILE", default_value = "output.epub")]
        output_file: PathBuf,
        #[command(flatten)]
        packaging: PackageArgs,
    },

    /// Text file to Markdown with promoted headings
    #[command(name = "txt2md")]
    TxtToMarkdown {
        #[arg(value_name = "INPUT", default_value = "input.txt")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT", default_value = "output_markdown.txt")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct BookArgs {
    /// Author shown on the title page
    #[arg(long)]
    author: Option<String>,
    /// Title instead of the first input line
    #[arg(long)]
    title: Option<String>,
    /// Leave out the table of contents
    #[arg(long)]
    no_toc: bool,
    /// Stylesheet to use instead of the default
    #[arg(long, value_name = "PATH")]
    css: Option<PathBuf>,
    /// Treat short and numbered lines as headings
    #[arg(long)]
    plain: bool,
}

#[derive(Args)]
struct PackageArgs {
    /// EPUB writer to use
    #[arg(long, value_enum, default_value_t = Writer::Auto)]
    writer: Writer,
    /// Path of the ebook-convert binary
    #[arg(long, value_name = "PATH", default_value = "ebook-convert")]
    ebook_convert: PathBuf,
    /// Seconds to wait for ebook-convert
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Writer {
    Embedded,
    EbookConvert,
    Auto,
}

impl BookArgs {
    fn apply(self, mut options: ConvertOptions) -> ConvertOptions {
        options.author = self.author;
        options.title = self.title;
        options.css = self.css;
        options.no_toc = self.no_toc;
        if self.plain {
            options.profile = Profile::Plain;
        }
        options
    }
}

impl PackageArgs {
    fn apply(self, options: ConvertOptions) -> ConvertOptions {
        let writer = match self.writer {
            Writer::Embedded => WriterChoice::Embedded,
            Writer::EbookConvert => WriterChoice::EbookConvert,
            Writer::Auto => WriterChoice::Auto,
        };
        let mut external = EbookConvertConfig::default().with_binary(self.ebook_convert);
        if let Some(secs) = self.timeout {
            external = external.with_timeout(Duration::from_secs(secs));
        }
        options.with_writer(writer).with_ebook_convert(external)
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> booksmith::Result<()> {
    let options = ConvertOptions::default();
    match command {
        Command::TxtToHtml {
            input,
            output,
            no_toc,
            css,
        } => {
            let options = ConvertOptions {
                no_toc,
                css,
                ..options
            };
            convert::txt_to_html(&input, &output, &options)
        }
        Command::TxtToHtmlDir { input, output, book } => {
            convert::txt_to_html_dir(&input, &output, &book.apply(options)).map(drop)
        }
        Command::TxtToEpub {
            input,
            output,
            book,
            cover,
            generate_cover,
            packaging,
        } => {
            let cover = match (cover, generate_cover) {
                (Some(path), _) => CoverSource::File(path),
                (None, true) => CoverSource::Generate(PlainCover::default()),
                (None, false) => CoverSource::None,
            };
            let options = packaging.apply(book.apply(options)).with_cover(cover);
            convert::txt_to_epub(&input, &output, &options).map(drop)
        }
        Command::ResourceToHtml {
            resource_dir,
            output_dir,
        } => convert::resource_to_html(&resource_dir, &output_dir, &options).map(drop),
        Command::ResourceToEpub {
            resource_dir,
            output_file,
            packaging,
        } => convert::resource_to_epub(&resource_dir, &output_file, &packaging.apply(options)).map(drop),
        Command::HtmlToEpub {
            html_dir,
            output_file,
            packaging,
        } => convert::html_to_epub(&html_dir, &output_file, &packaging.apply(options)).map(drop),
        Command::TxtToMarkdown { input, output } => convert::txt_to_markdown(&input, &output, &options),
    }
}
