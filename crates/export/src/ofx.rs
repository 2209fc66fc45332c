use thiserror::Error;

#[derive(Error, Debug)]
pub enum OfxError {
    #[error("Failed to parse OFX: {0}")]
    ParseError(String),
    #[error("Template is missing required element: {0}")]
    MissingElement(String),
}

/// One node of the document body: a leaf carries text, an aggregate
/// carries children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub node: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Aggregate(Vec<Element>),
}

impl Element {
    pub fn leaf(name: &str, text: impl Into<String>) -> Element {
        Element {
            name: name.to_string(),
            node: Node::Text(text.into()),
        }
    }

    pub fn aggregate(name: &str, children: Vec<Element>) -> Element {
        Element {
            name: name.to_string(),
            node: Node::Aggregate(children),
        }
    }
}

/// A parsed OFX file: the `KEY:VALUE` header block plus the body tree.
#[derive(Debug, Clone, PartialEq)]
pub struct OfxDocument {
    pub header: Vec<(String, String)>,
    pub root: Element,
}

const TXN_LIST_PATH: [&str; 4] = ["BANKMSGSRSV1", "STMTTRNRS", "STMTRS", "BANKTRANLIST"];
const LEDGER_PATH: [&str; 5] = ["BANKMSGSRSV1", "STMTTRNRS", "STMTRS", "LEDGERBAL", "BALAMT"];

impl OfxDocument {
    fn descend_mut(&mut self, path: &[&str]) -> Result<&mut Element, OfxError> {
        let mut current = &mut self.root;
        for name in path {
            let Node::Aggregate(children) = &mut current.node else {
                return Err(OfxError::MissingElement((*name).to_string()));
            };
            current = children
                .iter_mut()
                .find(|c| c.name == *name)
                .ok_or_else(|| OfxError::MissingElement((*name).to_string()))?;
        }
        Ok(current)
    }

    /// The statement's transaction-list children (BANKTRANLIST contents).
    pub fn transaction_list_mut(&mut self) -> Result<&mut Vec<Element>, OfxError> {
        match &mut self.descend_mut(&TXN_LIST_PATH)?.node {
            Node::Aggregate(children) => Ok(children),
            Node::Text(_) => Err(OfxError::MissingElement("BANKTRANLIST".to_string())),
        }
    }

    /// The ledger-balance amount text (LEDGERBAL/BALAMT).
    pub fn ledger_balance_mut(&mut self) -> Result<&mut String, OfxError> {
        match &mut self.descend_mut(&LEDGER_PATH)?.node {
            Node::Text(text) => Ok(text),
            Node::Aggregate(_) => Err(OfxError::MissingElement("BALAMT".to_string())),
        }
    }
}

/// Parse SGML-flavor OFX text: header lines up to the first tag, then one
/// tag per line. `<TAG>text` is a leaf; `<TAG>` opens an aggregate that
/// `</TAG>` closes.
pub fn parse(text: &str) -> Result<OfxDocument, OfxError> {
    let mut header = Vec::new();
    // Stack of open aggregates: (name, children collected so far).
    let mut stack: Vec<(String, Vec<Element>)> = Vec::new();
    let mut root: Option<Element> = None;
    let mut in_body = false;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if !in_body {
            if !line.starts_with('<') {
                if let Some((key, value)) = line.split_once(':') {
                    header.push((key.trim().to_string(), value.trim().to_string()));
                }
                continue;
            }
            in_body = true;
        }

        let Some(tag) = line.strip_prefix('<') else {
            return Err(OfxError::ParseError(format!("text outside a tag: {line}")));
        };

        if let Some(name) = tag.strip_prefix('/') {
            let name = name.trim_end_matches('>').trim();
            let Some((open_name, children)) = stack.pop() else {
                return Err(OfxError::ParseError(format!(
                    "unmatched closing tag </{name}>"
                )));
            };
            if open_name != name {
                return Err(OfxError::ParseError(format!(
                    "closing tag </{name}> does not match <{open_name}>"
                )));
            }
            let done = Element::aggregate(&open_name, children);
            match stack.last_mut() {
                Some((_, parent)) => parent.push(done),
                None if root.is_none() => root = Some(done),
                None => {
                    return Err(OfxError::ParseError(
                        "more than one root element".to_string(),
                    ))
                }
            }
        } else if let Some((name, value)) = tag.split_once('>') {
            let name = name.trim();
            let value = value.trim();
            if value.is_empty() {
                stack.push((name.to_string(), Vec::new()));
            } else {
                let Some((_, parent)) = stack.last_mut() else {
                    return Err(OfxError::ParseError(format!(
                        "leaf <{name}> outside an aggregate"
                    )));
                };
                parent.push(Element::leaf(name, value));
            }
        } else {
            return Err(OfxError::ParseError(format!("malformed tag: {line}")));
        }
    }

    if let Some((open_name, _)) = stack.last() {
        return Err(OfxError::ParseError(format!(
            "unclosed element <{open_name}>"
        )));
    }

    match root {
        Some(root) => Ok(OfxDocument { header, root }),
        None => Err(OfxError::ParseError("no document body".to_string())),
    }
}

/// Serialize a document back to OFX text: header block, blank line, body.
pub fn serialize(document: &OfxDocument) -> String {
    let mut out = String::new();
    for (key, value) in &document.header {
        out.push_str(key);
        out.push(':');
        out.push_str(value);
        out.push('\n');
    }
    out.push('\n');
    write_element(&mut out, &document.root);
    out
}

fn write_element(out: &mut String, element: &Element) {
    match &element.node {
        Node::Text(text) => {
            out.push('<');
            out.push_str(&element.name);
            out.push('>');
            out.push_str(text);
            out.push('\n');
        }
        Node::Aggregate(children) => {
            out.push('<');
            out.push_str(&element.name);
            out.push_str(">\n");
            for child in children {
                write_element(out, child);
            }
            out.push_str("</");
            out.push_str(&element.name);
            out.push_str(">\n");
        }
    }
}
