//! CLI entrypoint.

use std::error::Error;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use docpage::core_api::pattern::{query_terms, query_to_pattern};
use docpage::dom::NodeId;
use docpage::{Docpage, MemberListing, MemberOrdering, Page, build_listing};
use owo_colors::OwoColorize;
use regex::Regex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
/// Member orderings selectable with `--order`.
enum OrderArg {
	/// One alphabetic listing.
	Alpha,
	/// Inherited members grouped by ancestor.
	Inherit,
}

impl From<OrderArg> for MemberOrdering {
	fn from(order: OrderArg) -> Self {
		match order {
			OrderArg::Alpha => Self::Alphabetic,
			OrderArg::Inherit => Self::Inheritance,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
/// Output formats of the `list` command.
enum ListFormat {
	/// Human-readable text (default).
	Text,
	/// Pretty-printed JSON.
	Json,
}

#[derive(Args, Clone)]
struct FilterArgs {
	/// Generated documentation page to load
	file: PathBuf,

	/// Filter text typed into the member filter box
	#[arg(short = 's', long)]
	search: Option<String>,

	/// Hide protected members
	#[arg(long, default_value_t = false)]
	hide_protected: bool,

	/// Member ordering to switch to
	#[arg(long, value_enum)]
	order: Option<OrderArg>,

	/// Click the toggle of this ancestor (repeatable)
	#[arg(long = "toggle-ancestor", value_name = "NAME")]
	toggle_ancestor: Vec<String>,

	/// Viewport width in pixels
	#[arg(long, value_name = "PX", default_value_t = 1024.0)]
	width: f32,

	/// Log page processing to stderr
	#[arg(short = 'v', long, default_value_t = false)]
	verbose: bool,
}

#[derive(Args, Clone)]
struct RenderArgs {
	#[command(flatten)]
	filters: FilterArgs,

	/// Expand the comment of this member (repeatable)
	#[arg(long, value_name = "NAME")]
	expand: Vec<String>,

	/// Write the page here instead of stdout
	#[arg(short = 'O', long)]
	output: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct ListArgs {
	#[command(flatten)]
	filters: FilterArgs,

	/// Select the output format
	#[arg(short = 'f', long, value_enum, default_value = "text")]
	format: ListFormat,

	/// Disable ANSI colors in CLI output
	#[arg(long, default_value_t = false)]
	no_color: bool,
}

#[derive(Subcommand, Clone)]
enum Command {
	/// Write the page after replaying the requested interactions.
	Render(RenderArgs),
	/// Print the members left visible by the requested interactions.
	List(ListArgs),
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Parsed command-line options for the docpage CLI.
struct Cli {
	#[command(subcommand)]
	command: Command,
}

fn init_tracing(verbose: bool) {
	let default_filter = if verbose { "docpage=debug" } else { "docpage=warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();
}

/// Load the page and replay the interactions requested on the command line.
fn open_page(filters: &FilterArgs) -> Result<Page, Box<dyn Error>> {
	let docpage = Docpage::new().with_viewport_width(Some(filters.width));
	let mut page = docpage.load(&filters.file)?;

	if let Some(order) = filters.order {
		let wanted = MemberOrdering::from(order);
		press_until(&mut page, "order", |page| page.ordering() == wanted)?;
	}
	if filters.hide_protected {
		press_until(&mut page, "visibility", Page::privacy_hidden)?;
	}
	for name in &filters.toggle_ancestor {
		let toggle = page
			.ancestor_toggle(name)
			.ok_or_else(|| format!("page has no ancestor toggle named `{name}`"))?;
		page.click(toggle);
	}
	if let Some(query) = filters.search.as_deref() {
		page.type_query(query);
	}
	Ok(page)
}

/// Click a filter-bar control until `done` holds, giving up after one full cycle.
fn press_until(
	page: &mut Page,
	control: &str,
	done: impl Fn(&Page) -> bool,
) -> Result<(), Box<dyn Error>> {
	let node = page
		.control(control)
		.ok_or_else(|| format!("page has no `#{control}` control"))?;
	let faces = page
		.cycling_buttons()
		.iter()
		.find(|button| button.node() == node || page.document().ancestors(button.node()).any(|id| id == node))
		.map(|button| button.faces().len())
		.unwrap_or(1);
	for _ in 0..faces {
		if done(page) {
			return Ok(());
		}
		let target = click_target(page, node);
		page.click(target);
	}
	if done(page) {
		Ok(())
	} else {
		Err(format!("`#{control}` cannot be switched to the requested state").into())
	}
}

/// The visible face of the cycling button inside `control`, so the click reaches every handler.
fn click_target(page: &Page, control: NodeId) -> NodeId {
	let doc = page.document();
	page.cycling_buttons()
		.iter()
		.filter(|button| button.node() == control || doc.ancestors(button.node()).any(|id| id == control))
		.find_map(|button| button.current(doc).map(|index| button.faces()[index]))
		.unwrap_or(control)
}

fn run_render(args: &RenderArgs) -> Result<(), Box<dyn Error>> {
	let mut page = open_page(&args.filters)?;

	for name in &args.expand {
		let signatures: Vec<NodeId> = page
			.member_nodes(name)
			.into_iter()
			.flat_map(|node| page.document().descendants_with_class(node, "signature"))
			.filter(|signature| page.document().has_class(*signature, "closed"))
			.collect();
		if signatures.is_empty() {
			tracing::warn!(member = name.as_str(), "no expandable member with this name");
		}
		for signature in signatures {
			page.click(signature);
		}
	}

	let html = page.into_document().to_html();
	match &args.output {
		Some(path) => std::fs::write(path, html)?,
		None => print!("{html}"),
	}
	Ok(())
}

fn run_list(args: &ListArgs) -> Result<(), Box<dyn Error>> {
	let page = open_page(&args.filters)?;
	let listing = build_listing(&page);

	if args.format == ListFormat::Json {
		let json = serde_json::to_string_pretty(&listing)?;
		println!("{json}");
		return Ok(());
	}

	if listing.sections.is_empty() {
		if listing.query.is_empty() {
			println!("No members visible.");
		} else {
			println!("No matches found for \"{}\".", listing.query);
		}
		return Ok(());
	}

	print!("{}", format_listing(&listing, should_color_output(args)));
	Ok(())
}

fn format_listing(listing: &MemberListing, color: bool) -> String {
	let label_width = listing
		.sections
		.iter()
		.flat_map(|section| &section.members)
		.map(|member| member.visibility.label().len())
		.max()
		.unwrap_or(0);

	let mut buffer = String::new();
	for section in &listing.sections {
		let heading = match &section.inherited_from {
			Some(owner) => format!("{} (inherited from {owner})", section.heading),
			None => section.heading.clone(),
		};
		if color {
			buffer.push_str(&heading.bold().to_string());
		} else {
			buffer.push_str(&heading);
		}
		buffer.push('\n');

		for member in &section.members {
			let marker = if member.expanded { "+" } else { " " };
			let line = format!(
				"  {marker} {label:<label_width$} {name}\n",
				label = member.visibility.label(),
				name = member.name
			);
			if color && !listing.query.is_empty() {
				buffer.push_str(&highlight_matches(&line, &listing.query));
			} else {
				buffer.push_str(&line);
			}
		}
	}
	buffer
}

fn should_color_output(args: &ListArgs) -> bool {
	if args.no_color {
		return false;
	}
	if std::env::var_os("NO_COLOR").is_some() {
		return false;
	}
	if std::env::var("TERM").ok().as_deref() == Some("dumb") {
		return false;
	}
	std::io::stdout().is_terminal()
}

/// Highlight every term of the filter text in `text`.
///
/// Terms are matched case-insensitively as alternatives, the same way the filter box matches
/// them. Falls back to substring highlighting if the pattern fails to compile.
fn highlight_matches(text: &str, query: &str) -> String {
	let pattern = query_to_pattern(query);
	if pattern.is_empty() {
		return text.to_string();
	}
	let regex = match Regex::new(&format!("(?i){pattern}")) {
		Ok(re) => re,
		Err(_) => return highlight_matches_simple(text, query),
	};

	let mut result = String::with_capacity(text.len() * 2);
	let mut last_end = 0;
	for mat in regex.find_iter(text) {
		result.push_str(&text[last_end..mat.start()]);
		result.push_str(&mat.as_str().bright_green().bold().to_string());
		last_end = mat.end();
	}
	result.push_str(&text[last_end..]);
	result
}

/// Highlight matches of each term using plain substring search.
fn highlight_matches_simple(text: &str, query: &str) -> String {
	let lowered = text.to_lowercase();
	// Lower-casing may change byte lengths; only highlight when offsets still line up.
	if lowered.len() != text.len() {
		return text.to_string();
	}
	let mut marks = vec![false; text.len()];
	for term in query_terms(query) {
		let mut start = 0;
		while let Some(pos) = lowered[start..].find(&term) {
			let begin = start + pos;
			marks[begin..begin + term.len()].iter_mut().for_each(|mark| *mark = true);
			start = begin + term.len().max(1);
		}
	}

	let mut result = String::with_capacity(text.len() * 2);
	let mut index = 0;
	while index < text.len() {
		let highlighted = marks[index];
		let mut end = index;
		while end < text.len() && marks[end] == highlighted {
			end += 1;
		}
		while !text.is_char_boundary(end) {
			end += 1;
		}
		let chunk = &text[index..end];
		if highlighted {
			result.push_str(&chunk.bright_green().bold().to_string());
		} else {
			result.push_str(chunk);
		}
		index = end;
	}
	result
}

fn main() {
	let cli = Cli::parse();
	let verbose = match &cli.command {
		Command::Render(args) => args.filters.verbose,
		Command::List(args) => args.filters.verbose,
	};
	init_tracing(verbose);

	if let Err(e) = run(cli) {
		eprintln!("{e}");
		process::exit(1);
	}
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
	match cli.command {
		Command::Render(args) => run_render(&args),
		Command::List(args) => run_list(&args),
	}
}
