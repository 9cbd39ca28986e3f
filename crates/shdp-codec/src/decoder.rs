//! Decodes a fyve/byte-mixed bit stream back into a document tree.
//!
//! The decoder is a state machine over `{Idle, TagName, AttrName, Data}`
//! driven one fyve at a time. Nesting is handled with an explicit stack of
//! in-progress elements rather than native recursion, so adversarial
//! inputs are bounded by [`MAX_DEPTH`] instead of the call stack.

use std::mem;

use tracing::trace;

use crate::bits::{BitReader, FyveStream};
use crate::error::CodecError;
use crate::symbols::{self, OpCode, CHAIN_LEN_WIDTH, FYVE_WIDTH, OP_PREFIX};
use crate::tree::{Document, Node};
use crate::MAX_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    TagName,
    AttrName,
    Data,
}

/// Decode the payload stream of an `HTML_FILE_RESPONSE` into a document.
///
/// The stream is terminal only when it is exhausted with no open element;
/// anything else is fatal for this payload and is never retried here.
///
/// # Errors
///
/// Returns [`CodecError::MalformedStream`] for any character or operating
/// code that is undefined in the current state, for nesting beyond
/// [`MAX_DEPTH`], and for a stream that ends with an element still open;
/// [`CodecError::TruncatedChain`] for a chain declaring more bytes than
/// remain; [`CodecError::ReservedCode`] for the all-ones fyve in a name.
pub fn decode_document(stream: &FyveStream) -> Result<Document, CodecError> {
    let mut reader = BitReader::new(stream);
    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<Node> = Vec::new();
    let mut current: Option<Node> = None;
    let mut attr_name = String::new();
    let mut state = State::Idle;

    while reader.remaining() >= usize::from(FYVE_WIDTH) {
        let fyve = reader.read(FYVE_WIDTH)? as u8;

        if fyve == OP_PREFIX {
            let op = OpCode::from_u8(reader.read(FYVE_WIDTH)? as u8)
                .ok_or(CodecError::MalformedStream("undefined operating code"))?;

            match (state, op) {
                (State::Idle, OpCode::StartOfTag) => {
                    current = Some(Node::default());
                    state = State::TagName;
                }
                (State::TagName, OpCode::StartOfAttributes) => {
                    state = State::AttrName;
                }
                (State::TagName, OpCode::StartOfData) | (State::AttrName, OpCode::StartOfData) => {
                    if !attr_name.is_empty() {
                        return Err(CodecError::MalformedStream("attribute name with no value"));
                    }
                    state = State::Data;
                }
                (State::AttrName, OpCode::Utf8Chain) => {
                    let value = read_chain(&mut reader)?;
                    if attr_name.is_empty() {
                        return Err(CodecError::MalformedStream("attribute value with no name"));
                    }
                    let node = open_node(&mut current)?;
                    if node.attribute(&attr_name).is_some() {
                        return Err(CodecError::MalformedStream("duplicate attribute name"));
                    }
                    node.attributes.push((mem::take(&mut attr_name), value));
                }
                (State::Data, OpCode::StartOfTag) => {
                    if stack.len() + 1 >= MAX_DEPTH {
                        return Err(CodecError::MalformedStream("tree nests too deeply"));
                    }
                    stack.push(open_node(&mut current).map(mem::take)?);
                    current = Some(Node::default());
                    state = State::TagName;
                }
                (State::Data, OpCode::Utf8Chain) => {
                    let text = read_chain(&mut reader)?;
                    open_node(&mut current)?.push_text(text);
                }
                (State::Data, OpCode::EndOfTag) => {
                    let node = current
                        .take()
                        .ok_or(CodecError::MalformedStream("end-of-tag with no open element"))?;
                    match stack.pop() {
                        Some(mut parent) => {
                            parent.push_child(node);
                            current = Some(parent);
                            state = State::Data;
                        }
                        None => {
                            roots.push(node);
                            state = State::Idle;
                        }
                    }
                }
                _ => {
                    return Err(CodecError::MalformedStream(
                        "operating code undefined for the current state",
                    ));
                }
            }
        } else {
            let c = symbols::decode_symbol(fyve)?;
            match state {
                State::TagName => open_node(&mut current)?.tag_name.push(c),
                State::AttrName => attr_name.push(c),
                _ => {
                    return Err(CodecError::MalformedStream(
                        "character code outside a tag or attribute name",
                    ));
                }
            }
        }
    }

    if reader.remaining() != 0 {
        return Err(CodecError::MalformedStream("trailing bits after document"));
    }
    if state != State::Idle || current.is_some() || !stack.is_empty() {
        return Err(CodecError::MalformedStream("stream ends with an open element"));
    }

    trace!(roots = roots.len(), bits = reader.position(), "decoded document");
    Ok(Document::from(roots))
}

fn open_node(current: &mut Option<Node>) -> Result<&mut Node, CodecError> {
    current
        .as_mut()
        .ok_or(CodecError::MalformedStream("no element is open"))
}

fn read_chain(reader: &mut BitReader<'_>) -> Result<String, CodecError> {
    let declared = reader.read(CHAIN_LEN_WIDTH)? as usize;
    if declared * 8 > reader.remaining() {
        return Err(CodecError::TruncatedChain {
            declared,
            remaining_bits: reader.remaining(),
        });
    }

    let mut bytes = Vec::with_capacity(declared);
    for _ in 0..declared {
        bytes.push(reader.read(8)? as u8);
    }

    String::from_utf8(bytes).map_err(|_| CodecError::MalformedStream("invalid utf-8 in chain"))
}
