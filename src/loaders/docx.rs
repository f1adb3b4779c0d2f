// src/loaders/docx.rs
use crate::utils::error::LoadError;
use roxmltree::Node;
use std::io::{Cursor, Read};

const DOCUMENT_PART: &str = "word/document.xml";
const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Reads the body paragraphs of a .docx package, one line per paragraph.
/// Paragraphs nested in tables or text boxes are not part of the body flow.
pub fn read_docx(bytes: &[u8]) -> Result<String, LoadError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| LoadError::Parse(format!("Not a Word document package: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| LoadError::Parse(format!("Missing {}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| LoadError::Parse(format!("Unreadable {}: {}", DOCUMENT_PART, e)))?;

    let doc = roxmltree::Document::parse(&xml)
        .map_err(|e| LoadError::Parse(format!("Malformed {}: {}", DOCUMENT_PART, e)))?;

    let body = doc
        .root_element()
        .children()
        .find(|n| is_wordml(n, "body"))
        .ok_or_else(|| LoadError::Parse("Document has no body".to_string()))?;

    let paragraphs: Vec<String> = body
        .children()
        .filter(|n| is_wordml(n, "p"))
        .map(|p| {
            let mut text = String::new();
            collect_run_text(p, &mut text);
            text
        })
        .collect();

    tracing::info!("Word document has {} paragraphs", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

fn is_wordml(node: &Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(WORDML_NS)
}

fn collect_run_text(node: Node, out: &mut String) {
    for child in node.children().filter(Node::is_element) {
        if child.tag_name().namespace() != Some(WORDML_NS) {
            continue; // drawings, markup-compatibility blocks, ...
        }
        match child.tag_name().name() {
            "t" => out.push_str(child.text().unwrap_or("")),
            "tab" => out.push('\t'),
            "cr" => out.push('\n'),
            // Page and column breaks do not split the paragraph text
            "br" => match child.attribute((WORDML_NS, "type")) {
                Some("page") | Some("column") => {}
                _ => out.push('\n'),
            },
            "txbxContent" | "del" | "pPr" | "rPr" => {}
            _ => collect_run_text(child, out), // runs, hyperlinks, smart tags
        }
    }
}
