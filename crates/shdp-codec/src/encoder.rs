//! Encodes a document tree into a fyve/byte-mixed bit stream.

use tracing::trace;

use crate::bits::{BitWriter, FyveStream};
use crate::error::CodecError;
use crate::symbols::{self, OpCode, CHAIN_LEN_WIDTH, FYVE_WIDTH, MAX_CHAIN_LEN, OP_WIDTH};
use crate::tree::{Content, Document, Node};
use crate::MAX_DEPTH;

/// Encode a document into the payload stream of an `HTML_FILE_RESPONSE`.
///
/// Traversal is depth-first and pre-order; top-level siblings are emitted
/// back-to-back with no enclosing markers. The stream is built into a
/// private writer, so a failing encode surfaces no partial output.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedCharacter`] if a tag or attribute name
/// contains a character outside the symbol table,
/// [`CodecError::OversizedChain`] if a text chunk or attribute value
/// exceeds [`MAX_CHAIN_LEN`] bytes, and [`CodecError::MalformedStream`]
/// if the tree nests deeper than [`MAX_DEPTH`].
pub fn encode_document(document: &Document) -> Result<FyveStream, CodecError> {
    let mut writer = BitWriter::new();

    for node in document.roots() {
        encode_node(&mut writer, node, 0)?;
    }

    let stream = writer.finish();
    trace!(bits = stream.bit_len(), "encoded document");
    Ok(stream)
}

fn encode_node(writer: &mut BitWriter, node: &Node, depth: usize) -> Result<(), CodecError> {
    if depth >= MAX_DEPTH {
        return Err(CodecError::MalformedStream("tree nests too deeply"));
    }

    writer.write(OpCode::StartOfTag.into(), OP_WIDTH)?;
    encode_name(writer, &node.tag_name)?;

    if !node.attributes.is_empty() {
        writer.write(OpCode::StartOfAttributes.into(), OP_WIDTH)?;
        for (name, value) in &node.attributes {
            encode_name(writer, name)?;
            // The value chain is emitted even when empty, so the decoder
            // always sees a name/value pair.
            encode_chain(writer, value.as_bytes())?;
        }
    }

    writer.write(OpCode::StartOfData.into(), OP_WIDTH)?;

    for child in &node.children {
        match child {
            Content::Element(node) => encode_node(writer, node, depth + 1)?,
            Content::Text(text) => encode_chain(writer, text.as_bytes())?,
        }
    }

    writer.write(OpCode::EndOfTag.into(), OP_WIDTH)?;
    Ok(())
}

fn encode_name(writer: &mut BitWriter, name: &str) -> Result<(), CodecError> {
    for c in name.chars() {
        let code = symbols::encode_symbol(c)?;
        writer.write(u32::from(code), FYVE_WIDTH)?;
    }
    Ok(())
}

fn encode_chain(writer: &mut BitWriter, bytes: &[u8]) -> Result<(), CodecError> {
    if bytes.len() > MAX_CHAIN_LEN {
        return Err(CodecError::OversizedChain(bytes.len()));
    }

    writer.write(OpCode::Utf8Chain.into(), OP_WIDTH)?;
    writer.write(bytes.len() as u32, CHAIN_LEN_WIDTH)?;
    writer.write_bytes(bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitReader;

    fn read_op(reader: &mut BitReader<'_>) -> u32 {
        reader.read(OP_WIDTH).unwrap()
    }

    #[test]
    fn test_empty_element() {
        let document = Document::new().with(Node::new("em"));
        let stream = encode_document(&document).unwrap();

        // start-of-tag, 'e', 'm', start-of-data, end-of-tag.
        let mut reader = BitReader::new(&stream);
        assert_eq!(read_op(&mut reader), 0x10);
        assert_eq!(reader.read(5).unwrap(), 5);
        assert_eq!(reader.read(5).unwrap(), 13);
        assert_eq!(read_op(&mut reader), 0x18);
        assert_eq!(read_op(&mut reader), 0x19);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_attribute_value_chain_is_emitted_even_when_empty() {
        let document = Document::new().with(Node::new("p").with_attribute("a", ""));
        let stream = encode_document(&document).unwrap();

        let mut reader = BitReader::new(&stream);
        assert_eq!(read_op(&mut reader), 0x10);
        assert_eq!(reader.read(5).unwrap(), 16); // 'p'
        assert_eq!(read_op(&mut reader), 0x11);
        assert_eq!(reader.read(5).unwrap(), 1); // 'a'
        assert_eq!(read_op(&mut reader), 0x00);
        assert_eq!(reader.read(10).unwrap(), 0); // empty chain
        assert_eq!(read_op(&mut reader), 0x18);
        assert_eq!(read_op(&mut reader), 0x19);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_unsupported_tag_character_fails() {
        let document = Document::new().with(Node::new("röd"));
        assert_eq!(
            encode_document(&document),
            Err(CodecError::UnsupportedCharacter('ö'))
        );
    }

    #[test]
    fn test_oversized_text_chunk_fails() {
        let document = Document::new().with(Node::new("p").with_text("x".repeat(1024)));
        assert_eq!(
            encode_document(&document),
            Err(CodecError::OversizedChain(1024))
        );
    }

    #[test]
    fn test_chain_at_the_limit_is_accepted() {
        let document = Document::new().with(Node::new("p").with_text("x".repeat(1023)));
        assert!(encode_document(&document).is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let mut node = Node::new("p");
        for _ in 0..MAX_DEPTH {
            node = Node::new("p").with_child(node);
        }
        let document = Document::new().with(node);

        assert_eq!(
            encode_document(&document),
            Err(CodecError::MalformedStream("tree nests too deeply"))
        );
    }
}
