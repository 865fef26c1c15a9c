// ByteBuffer 单元测试

use pretty_assertions::assert_eq;
use rstest::rstest;
use zhex::core::buffer::{ByteBuffer, ContentRange, RangeKind};

/// 区间列表快照：(起始偏移, 内容)
fn snapshot(buffer: &ByteBuffer) -> Vec<(usize, Vec<u8>)> {
    buffer
        .ranges()
        .iter()
        .map(|range| {
            let bytes = range.read_bytes(range.start_offset(), range.size()).unwrap();
            (range.start_offset(), bytes)
        })
        .collect()
}

fn expected(chunks: &[&[u8]]) -> Vec<(usize, Vec<u8>)> {
    let mut offset = 0;
    chunks
        .iter()
        .map(|chunk| {
            let entry = (offset, chunk.to_vec());
            offset += chunk.len();
            entry
        })
        .collect()
}

fn assert_invariants(buffer: &ByteBuffer) {
    let mut offset = 0;
    for range in buffer.ranges() {
        assert_eq!(range.start_offset(), offset, "ranges must be contiguous");
        assert!(range.size() > 0, "zero-length range at {}", offset);
        offset = range.end_offset();
    }
    assert_eq!(offset, buffer.size());
}

fn contents(buffer: &ByteBuffer) -> Vec<u8> {
    buffer.read_bytes(0, buffer.size()).unwrap()
}

// ========== 插入 ==========

#[test]
fn test_empty_buffer() {
    let buffer = ByteBuffer::new();
    assert!(buffer.is_empty());
    assert_eq!(buffer.size(), 0);
    assert_eq!(buffer.range_count(), 0);
    assert_eq!(buffer.path(), None);
    assert_eq!(buffer.read_bytes(0, 0).unwrap(), b"");
}

#[test]
fn test_simple_inserting() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"test");
    assert_eq!(snapshot(&buffer), expected(&[b"test"]));
    assert_eq!(buffer.ranges()[0].kind(), RangeKind::Memory);
}

#[test]
fn test_empty_insertions() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"");
    assert_eq!(buffer.range_count(), 0);

    buffer.insert(0, b"abc");
    buffer.insert(1, b"");
    assert_eq!(snapshot(&buffer), expected(&[b"abc"]));
}

#[test]
#[should_panic]
fn test_insert_past_end() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"x");
    buffer.insert(2, b"whatever");
}

#[test]
fn test_inserting_at_edges() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"4");
    buffer.insert(0, b"2");
    buffer.insert(1, b"3");
    buffer.insert(0, b"1");

    assert_eq!(buffer.read_bytes(0, 4).unwrap(), b"1234");
    assert_eq!(snapshot(&buffer), expected(&[b"1", b"2", b"3", b"4"]));
}

#[test]
fn test_inserting_with_split() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"abcd");
    buffer.insert(4, b"efgh");
    buffer.insert(3, b"!");

    assert_eq!(buffer.read_bytes(0, 9).unwrap(), b"abc!defgh");
    assert_eq!(snapshot(&buffer), expected(&[b"abc", b"!", b"d", b"efgh"]));
}

#[test]
fn test_alternating_prepend_append_keeps_one_range_per_insert() {
    let mut buffer = ByteBuffer::new();
    for i in 0..50u8 {
        if i % 2 == 0 {
            buffer.insert(0, &[i]);
        } else {
            buffer.insert(buffer.size(), &[i]);
        }
    }
    assert_eq!(buffer.range_count(), 50);
    assert_invariants(&buffer);
}

#[test]
fn test_read_write_round_trip() {
    let data: Vec<u8> = (0..=255).collect();
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, &data);
    assert_eq!(buffer.read_bytes(0, data.len()).unwrap(), data);
}

// ========== 删除 ==========

/// 由 `-`、`#`、`|` 组成的分块布局
///
/// `-` 和 `#` 各代表一个字节（依次为 a、b、c…），`|` 分隔依次插入的块，
/// `#` 标记的连续区域是要删除的部分。
struct Layout {
    all_chunks: Vec<Vec<u8>>,
    hash_chunks: Vec<Vec<u8>>,
    not_hash_chunks: Vec<Vec<u8>>,
    offset: usize,
    size: usize,
}

impl Layout {
    fn parse(text: &str) -> Self {
        let mut letter = b'a';
        let mut all_mask = Vec::new();
        let mut hash_mask = Vec::new();
        let mut not_hash_mask = Vec::new();

        for c in text.chars() {
            match c {
                '-' | '#' => {
                    all_mask.push(letter);
                    if c == '#' {
                        hash_mask.push(letter);
                        not_hash_mask.push(b'|');
                    } else {
                        hash_mask.push(b'|');
                        not_hash_mask.push(letter);
                    }
                    letter += 1;
                }
                '|' => {
                    all_mask.push(b'|');
                    hash_mask.push(b'|');
                    not_hash_mask.push(b'|');
                }
                _ => panic!("unexpected layout character {:?}", c),
            }
        }

        let flat: String = text.chars().filter(|&c| c != '|').collect();
        let (offset, size) = match (flat.find('#'), flat.rfind('#')) {
            (Some(first), Some(last)) => (first, last + 1 - first),
            _ => (0, 0),
        };

        Self {
            all_chunks: split_chunks(&all_mask),
            hash_chunks: split_chunks(&hash_mask),
            not_hash_chunks: split_chunks(&not_hash_mask),
            offset,
            size,
        }
    }

    fn build(&self) -> ByteBuffer {
        let mut buffer = ByteBuffer::new();
        for chunk in &self.all_chunks {
            buffer.insert(buffer.size(), chunk);
        }
        buffer
    }
}

fn split_chunks(mask: &[u8]) -> Vec<Vec<u8>> {
    mask.split(|&b| b == b'|')
        .filter(|chunk| !chunk.is_empty())
        .map(<[u8]>::to_vec)
        .collect()
}

#[rstest]
#[case("####|##--")]
#[case("####|#---")]
#[case("####|----")]
#[case("##|#|----")]
#[case("###-|----")]
#[case("##--|----")]
#[case("#---|----")]
#[case("#-|----")]
#[case("#|----")]
#[case("-##-|----")]
#[case("-#--|----")]
#[case("--#-|----")]
#[case("--##|----")]
#[case("---#|----")]
#[case("--##|####")]
#[case("---#|####")]
#[case("----|####")]
#[case("----|#|##")]
#[case("----|-###")]
#[case("----|--##")]
#[case("----|---#")]
#[case("----|-#")]
#[case("----|#")]
#[case("----|-##-")]
#[case("----|--#-")]
#[case("----|-#--")]
#[case("----|##--")]
#[case("----|#---")]
#[case("----|####|----")]
#[case("----|##|##|----")]
#[case("--##|####|----")]
#[case("----|####|##--")]
#[case("--##|####|##--")]
#[case("----|##--|----")]
#[case("----|--##|----")]
#[case("----|-##-|----")]
#[case("----|#|----")]
#[case("----|#|#|----")]
#[case("---#|####|----")]
#[case("----|####|#---")]
#[case("---#|####|#---")]
#[case("----|#---|----")]
#[case("----|---#|----")]
#[case("----|-#--|----")]
#[case("#-")]
#[case("-")]
#[case("-|#-")]
#[case("-|#")]
#[case("#|-")]
fn test_delete_coverage(#[case] text: &str) {
    let layout = Layout::parse(text);
    let mut buffer = layout.build();
    let original_size = buffer.size();

    let marked = buffer.read_bytes(layout.offset, layout.size).unwrap();
    assert_eq!(marked, layout.hash_chunks.concat());

    buffer.delete(layout.offset, layout.size);

    let survivors: Vec<&[u8]> = layout.not_hash_chunks.iter().map(Vec::as_slice).collect();
    assert_eq!(snapshot(&buffer), expected(&survivors));
    assert_eq!(contents(&buffer), layout.not_hash_chunks.concat());
    assert_eq!(buffer.size(), original_size - layout.size);
    assert_invariants(&buffer);
}

#[test]
fn test_delete_zero_size_is_noop() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"abcd");
    buffer.delete(2, 0);
    buffer.delete(4, 10);
    assert_eq!(snapshot(&buffer), expected(&[b"abcd"]));
}

#[test]
fn test_delete_everything() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"abcd");
    buffer.insert(4, b"efgh");
    buffer.delete(0, buffer.size());
    assert!(buffer.is_empty());
    assert_eq!(buffer.size(), 0);

    buffer.insert(0, b"x");
    assert_eq!(contents(&buffer), b"x");
}

#[test]
#[should_panic]
fn test_delete_past_end() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"abcd");
    buffer.delete(5, 1);
}

// ========== 替换 ==========

#[test]
fn test_replace_overwrites_in_place() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"abcdef");
    buffer.replace(2, b"XY");
    assert_eq!(contents(&buffer), b"abXYef");
    assert_eq!(buffer.size(), 6);
    assert_invariants(&buffer);
}

#[test]
fn test_replace_at_end_extends() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"abc");
    buffer.replace(2, b"XYZ");
    assert_eq!(contents(&buffer), b"abXYZ");

    buffer.replace(buffer.size(), b"!");
    assert_eq!(contents(&buffer), b"abXYZ!");
}

#[test]
fn test_replace_single_byte_across_chunks() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"ab");
    buffer.insert(2, b"cd");
    buffer.replace(1, b"12");
    assert_eq!(contents(&buffer), b"a12d");
    assert_invariants(&buffer);
}

// ========== 读取 ==========

#[test]
fn test_read_spanning_ranges() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"abc");
    buffer.insert(3, b"def");
    buffer.insert(6, b"ghi");
    assert_eq!(buffer.read_bytes(2, 5).unwrap(), b"cdefg");
    assert_eq!(buffer.read_bytes(3, 3).unwrap(), b"def");
    assert_eq!(buffer.read_bytes(9, 0).unwrap(), b"");
}

#[test]
#[should_panic]
fn test_read_past_end() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"abc");
    let _ = buffer.read_bytes(1, 3);
}

#[test]
fn test_chunk_iteration() {
    let mut buffer = ByteBuffer::new();
    buffer.insert(0, b"Hello world! ");
    buffer.insert(13, b"This is a test.");

    let chunks: Vec<Vec<u8>> = buffer.chunks(10).collect::<Result<_, _>>().unwrap();
    assert_eq!(chunks.len(), 3);
    assert!(chunks.iter().all(|chunk| chunk.len() <= 10));
    assert_eq!(chunks.concat(), b"Hello world! This is a test.");

    let tail: Vec<Vec<u8>> = buffer.chunks_from(21, 4).collect::<Result<_, _>>().unwrap();
    assert_eq!(tail, vec![b"a te".to_vec(), b"st.".to_vec()]);

    assert_eq!(buffer.chunks_from(100, 4).count(), 0);
}

#[test]
#[should_panic]
fn test_zero_chunk_size() {
    let buffer = ByteBuffer::new();
    let _ = buffer.chunks(0);
}

// ========== 随机编辑序列 ==========

/// 线性同余生成器，保证测试可重复
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound.max(1)
    }
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
fn test_random_edits_match_model(#[case] seed: u64) {
    let mut rng = Lcg(seed);
    let mut buffer = ByteBuffer::new();
    let mut model: Vec<u8> = Vec::new();
    let mut inserted = 0;
    let mut deleted = 0;

    for step in 0..300 {
        let offset = rng.next(model.len() + 1);
        let len = rng.next(6) + 1;
        let data: Vec<u8> = (0..len).map(|i| (step + i) as u8).collect();

        match rng.next(3) {
            0 => {
                buffer.insert(offset, &data);
                model.splice(offset..offset, data.iter().copied());
                inserted += len;
            }
            1 => {
                let removed = len.min(model.len() - offset);
                buffer.delete(offset, len);
                model.drain(offset..offset + removed);
                deleted += removed;
            }
            _ => {
                let removed = len.min(model.len() - offset);
                buffer.replace(offset, &data);
                model.splice(offset..offset + removed, data.iter().copied());
                inserted += len;
                deleted += removed;
            }
        }

        assert_invariants(&buffer);
        assert_eq!(buffer.size(), inserted - deleted);
    }

    assert_eq!(contents(&buffer), model);
    assert!(buffer.ranges().iter().all(|range| matches!(range, ContentRange::Memory(_))));
}
