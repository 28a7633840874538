use crate::language::fence_language;
use crate::output_formats::{FileRecord, OutputStyle, get_document_text};
use crate::processing::ContentTransforms;
use crate::sorting::ParsedPath;
use crate::tree::render_paths;
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::error::Error;
use std::io::{Cursor, Write};

const PLAIN_RULE: &str = "================================================================";
const PLAIN_FILE_RULE: &str = "================";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub header_text: Option<String>,
    pub instruction: Option<String>,
    pub transforms: ContentTransforms,
    /// When positive, only the first N files (after sorting) get a content block.
    pub top_files_length: usize,
    pub show_tree: bool,
    pub include_summary: bool,
    /// Supplied by the caller so rendering stays a pure function of its inputs.
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            header_text: None,
            instruction: None,
            transforms: ContentTransforms::default(),
            top_files_length: 0,
            show_tree: true,
            include_summary: true,
            generated_at: None,
        }
    }
}

struct Summary {
    intro: String,
    purpose: String,
    file_format: String,
    usage_guidelines: Vec<String>,
    notes: Vec<String>,
    generated_at: Option<String>,
}

struct RenderedFile {
    path: String,
    language: String,
    body: String,
}

struct Document<'a> {
    summary: Option<Summary>,
    header: Option<&'a str>,
    tree: Option<String>,
    files: Vec<RenderedFile>,
    instruction: Option<&'a str>,
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

fn build_summary(options: &RenderOptions, truncated: bool) -> Summary {
    let text = get_document_text();
    let mut notes = text.notes.clone();
    if options.transforms.remove_comments {
        notes.push(text.comments_removed_note.clone());
    }
    if options.transforms.remove_empty_lines {
        notes.push(text.empty_lines_removed_note.clone());
    }
    if options.transforms.show_line_numbers {
        notes.push(text.line_numbers_note.clone());
    }
    if truncated {
        notes.push(
            text.truncated_note
                .replace("{count}", &options.top_files_length.to_string()),
        );
    }

    Summary {
        intro: text.intro.clone(),
        purpose: text.purpose.clone(),
        file_format: text.file_format.clone(),
        usage_guidelines: text.usage_guidelines.clone(),
        notes,
        generated_at: options
            .generated_at
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
    }
}

fn build_document<'a>(files: &[FileRecord], options: &'a RenderOptions) -> Document<'a> {
    let mut ordered: Vec<(ParsedPath, &FileRecord)> = files
        .iter()
        .map(|file| (ParsedPath::parse(&file.path), file))
        .collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0));

    let shown = if options.top_files_length > 0 {
        options.top_files_length.min(ordered.len())
    } else {
        ordered.len()
    };
    let truncated = shown < ordered.len();
    log::debug!(
        "Rendering {} of {} files (tree: {}, summary: {})",
        shown,
        ordered.len(),
        options.show_tree,
        options.include_summary
    );

    let tree = options.show_tree.then(|| {
        let paths: Vec<&str> = ordered.iter().map(|(p, _)| p.normalized.as_str()).collect();
        render_paths(&paths)
    });

    let rendered_files = ordered
        .iter()
        .take(shown)
        .map(|(parsed, file)| RenderedFile {
            path: parsed.normalized.clone(),
            language: fence_language(&parsed.normalized),
            body: options.transforms.apply(&parsed.normalized, &file.content),
        })
        .collect();

    Document {
        summary: options
            .include_summary
            .then(|| build_summary(options, truncated)),
        header: non_empty(&options.header_text),
        tree,
        files: rendered_files,
        instruction: non_empty(&options.instruction),
    }
}

/// Renders the packed document for `files` in the requested style.
pub fn render(files: &[FileRecord], style: OutputStyle, options: &RenderOptions) -> String {
    let document = build_document(files, options);
    match style {
        OutputStyle::Plain => render_plain(&document),
        OutputStyle::Markdown => render_markdown(&document),
        OutputStyle::Xml => render_xml(&document),
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn plain_section(out: &mut String, title: &str) {
    out.push_str(&format!("{PLAIN_RULE}\n{title}\n{PLAIN_RULE}\n"));
}

fn plain_subsection(out: &mut String, title: &str, body: &str) {
    let underline = "-".repeat(title.len());
    out.push_str(&format!("{title}\n{underline}\n{body}\n\n"));
}

fn render_plain(doc: &Document<'_>) -> String {
    let mut out = String::new();

    if let Some(summary) = &doc.summary {
        out.push_str(&format!("{}\n\n", summary.intro));
        plain_section(&mut out, "File Summary");
        out.push('\n');
        plain_subsection(&mut out, "Purpose:", &summary.purpose);
        plain_subsection(&mut out, "File Format:", &summary.file_format);
        plain_subsection(
            &mut out,
            "Usage Guidelines:",
            &bullet_list(&summary.usage_guidelines),
        );
        plain_subsection(&mut out, "Notes:", &bullet_list(&summary.notes));
        if let Some(ts) = &summary.generated_at {
            out.push_str(&format!("Generated: {}\n\n", ts));
        }
    }

    if let Some(header) = doc.header {
        plain_section(&mut out, "User Provided Header");
        out.push_str(&format!("{}\n\n", header));
    }

    if let Some(tree) = &doc.tree {
        plain_section(&mut out, "Directory Structure");
        out.push_str(&format!("{}\n\n", tree));
    }

    plain_section(&mut out, "Files");
    out.push('\n');
    for file in &doc.files {
        out.push_str(&format!(
            "{PLAIN_FILE_RULE}\nFile: {}\n{PLAIN_FILE_RULE}\n{}\n\n",
            file.path, file.body
        ));
    }

    if let Some(instruction) = doc.instruction {
        plain_section(&mut out, "Instruction");
        out.push_str(&format!("{}\n", instruction));
    }

    finish(out)
}

// A fence one backtick longer than the longest run inside the body.
fn code_fence(body: &str) -> String {
    let mut longest = 0;
    let mut current = 0;
    for ch in body.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn render_markdown(doc: &Document<'_>) -> String {
    let mut out = String::new();

    if let Some(summary) = &doc.summary {
        out.push_str(&format!("{}\n\n# File Summary\n\n", summary.intro));
        out.push_str(&format!("## Purpose\n{}\n\n", summary.purpose));
        out.push_str(&format!("## File Format\n{}\n\n", summary.file_format));
        out.push_str(&format!(
            "## Usage Guidelines\n{}\n\n",
            bullet_list(&summary.usage_guidelines)
        ));
        out.push_str(&format!("## Notes\n{}\n\n", bullet_list(&summary.notes)));
        if let Some(ts) = &summary.generated_at {
            out.push_str(&format!("Generated: {}\n\n", ts));
        }
    }

    if let Some(header) = doc.header {
        out.push_str(&format!("# User Provided Header\n{}\n\n", header));
    }

    if let Some(tree) = &doc.tree {
        let fence = code_fence(tree);
        out.push_str(&format!("# Directory Structure\n{fence}\n{tree}\n{fence}\n\n"));
    }

    out.push_str("# Files\n\n");
    for file in &doc.files {
        let fence = code_fence(&file.body);
        out.push_str(&format!(
            "## File: {}\n{fence}{}\n{}\n{fence}\n\n",
            file.path, file.language, file.body
        ));
    }

    if let Some(instruction) = doc.instruction {
        out.push_str(&format!("# Instruction\n{}\n", instruction));
    }

    finish(out)
}

type XmlResult<T = ()> = std::result::Result<T, Box<dyn Error>>;

// Writes pre-escaped text; layout newlines go through here too.
fn xml_text<W: Write>(writer: &mut Writer<W>, escaped: &str) -> XmlResult {
    writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
    Ok(())
}

// `<name attrs>\n{body}\n</name>` with the body escaped.
fn xml_block<W: Write>(writer: &mut Writer<W>, element: BytesStart<'_>, body: &str) -> XmlResult {
    let end = element.to_end().into_owned();
    writer.write_event(Event::Start(element))?;
    xml_text(writer, &format!("\n{}\n", escape(body)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

fn write_xml_summary<W: Write>(writer: &mut Writer<W>, summary: &Summary) -> XmlResult {
    xml_text(writer, &format!("{}\n\n", escape(&summary.intro)))?;
    writer.write_event(Event::Start(BytesStart::new("file_summary")))?;
    xml_text(writer, "\n")?;
    xml_block(writer, BytesStart::new("purpose"), &summary.purpose)?;
    xml_text(writer, "\n\n")?;
    xml_block(writer, BytesStart::new("file_format"), &summary.file_format)?;
    xml_text(writer, "\n\n")?;
    xml_block(
        writer,
        BytesStart::new("usage_guidelines"),
        &bullet_list(&summary.usage_guidelines),
    )?;
    xml_text(writer, "\n\n")?;
    xml_block(writer, BytesStart::new("notes"), &bullet_list(&summary.notes))?;
    xml_text(writer, "\n")?;
    if let Some(ts) = &summary.generated_at {
        xml_text(writer, "\n")?;
        writer.write_event(Event::Start(BytesStart::new("generated_at")))?;
        xml_text(writer, &escape(ts))?;
        writer.write_event(Event::End(BytesEnd::new("generated_at")))?;
        xml_text(writer, "\n")?;
    }
    writer.write_event(Event::End(BytesEnd::new("file_summary")))?;
    xml_text(writer, "\n\n")
}

fn write_xml(doc: &Document<'_>) -> XmlResult<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    if let Some(summary) = &doc.summary {
        write_xml_summary(&mut writer, summary)?;
    }

    if let Some(header) = doc.header {
        xml_block(&mut writer, BytesStart::new("user_provided_header"), header)?;
        xml_text(&mut writer, "\n\n")?;
    }

    if let Some(tree) = &doc.tree {
        xml_block(&mut writer, BytesStart::new("directory_structure"), tree)?;
        xml_text(&mut writer, "\n\n")?;
    }

    writer.write_event(Event::Start(BytesStart::new("files")))?;
    xml_text(&mut writer, "\n")?;
    for file in &doc.files {
        let mut element = BytesStart::new("file");
        element.push_attribute(("path", file.path.as_str()));
        xml_block(&mut writer, element, &file.body)?;
        xml_text(&mut writer, "\n\n")?;
    }
    writer.write_event(Event::End(BytesEnd::new("files")))?;
    xml_text(&mut writer, "\n")?;

    if let Some(instruction) = doc.instruction {
        xml_text(&mut writer, "\n")?;
        xml_block(&mut writer, BytesStart::new("instruction"), instruction)?;
        xml_text(&mut writer, "\n")?;
    }

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn render_xml(doc: &Document<'_>) -> String {
    match write_xml(doc) {
        Ok(out) => finish(out),
        Err(e) => {
            log::error!("Failed to write XML document: {}", e);
            String::new()
        }
    }
}

fn finish(mut out: String) -> String {
    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}
