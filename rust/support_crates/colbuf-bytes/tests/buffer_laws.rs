use std::sync::Arc;

use colbuf_alloc::{HeapAllocator, PageAllocator, SharedAllocator, default_allocator};
use colbuf_bytes::{ByteBuffer, GrowthPolicy};
use colbuf_testkit::allocators::{CountingAllocator, FailingAllocator, RelocatingAllocator};

fn relocating_buffer() -> ByteBuffer {
    let mut buffer = ByteBuffer::new();
    buffer
        .set_allocator(Arc::new(RelocatingAllocator))
        .expect("set_allocator");
    buffer
}

fn assert_invariants(buffer: &ByteBuffer) {
    assert!(buffer.len() <= buffer.capacity());
    assert_eq!(buffer.capacity() == 0, buffer.as_ptr().is_null());
}

#[test]
fn test_buffer_basic() {
    let mut buffer = relocating_buffer();
    assert!(buffer.as_ptr().is_null());
    assert_eq!(buffer.capacity(), 0);
    assert_eq!(buffer.len(), 0);

    // Reserve where the request exceeds capacity * growth factor.
    buffer.reserve(10).unwrap();
    assert!(!buffer.as_ptr().is_null());
    assert_eq!(buffer.capacity(), 10);
    assert_eq!(buffer.len(), 0);

    // Write without triggering a reallocation.
    let first_data = buffer.as_ptr();
    buffer.append(b"1234567890").unwrap();
    assert_eq!(buffer.as_ptr(), first_data);
    assert_eq!(buffer.capacity(), 10);
    assert_eq!(buffer.len(), 10);

    // Write triggering a reallocation.
    buffer.append(b"1\0").unwrap();
    assert_ne!(buffer.as_ptr(), first_data);
    assert_eq!(buffer.capacity(), 20);
    assert_eq!(buffer.len(), 12);
    assert_eq!(buffer.as_slice(), b"12345678901\0");

    // Resize smaller without shrinking.
    buffer.resize(5, false).unwrap();
    assert_eq!(buffer.capacity(), 20);
    assert_eq!(buffer.len(), 5);
    assert_eq!(buffer.as_slice(), b"12345");

    // Resize smaller with shrinking.
    buffer.resize(4, true).unwrap();
    assert_eq!(buffer.capacity(), 4);
    assert_eq!(buffer.len(), 4);
    assert_eq!(buffer.as_slice(), b"1234");

    buffer.reset();
    assert!(buffer.as_ptr().is_null());
    assert_eq!(buffer.capacity(), 0);
    assert_eq!(buffer.len(), 0);
}

#[test]
fn test_buffer_move() {
    let mut buffer = relocating_buffer();
    buffer.append(b"1234567").unwrap();
    assert_eq!(buffer.len(), 7);
    assert_eq!(buffer.capacity(), 7);

    let buffer_out = buffer.take();
    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.capacity(), 0);
    assert!(buffer.as_ptr().is_null());
    assert_eq!(buffer_out.len(), 7);
    assert_eq!(buffer_out.capacity(), 7);
    assert_eq!(buffer_out.as_slice(), b"1234567");
}

#[test]
fn test_buffer_fill() {
    let mut buffer = ByteBuffer::new();

    buffer.append_fill(0xff, 10).unwrap();
    assert_eq!(buffer.len(), 10);
    assert!(buffer.iter().all(|&b| b == 0xff));

    buffer.resize(0, false).unwrap();
    buffer.append_fill(0, 10).unwrap();
    assert_eq!(buffer.len(), 10);
    assert!(buffer.iter().all(|&b| b == 0));

    buffer.append_fill(0xff, 0).unwrap();
    assert_eq!(buffer.len(), 10);

    buffer.reset();

    let err = buffer.append_fill(0, i64::MAX as usize).unwrap_err();
    assert!(err.is_out_of_memory());
    assert_invariants(&buffer);
}

#[test]
fn test_buffer_resize_0() {
    let mut buffer = relocating_buffer();
    buffer.append(b"1234567").unwrap();
    assert_eq!(buffer.len(), 7);
    assert_eq!(buffer.capacity(), 7);

    buffer.resize(0, false).unwrap();
    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.capacity(), 7);

    buffer.resize(0, true).unwrap();
    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.capacity(), 0);
    assert!(buffer.as_ptr().is_null());
}

#[test]
fn test_buffer_error() {
    let mut buffer = ByteBuffer::new();
    assert!(buffer.resize(i64::MAX, false).unwrap_err().is_out_of_memory());
    assert!(buffer.reserve(usize::MAX).unwrap_err().is_out_of_memory());
    assert_invariants(&buffer);

    buffer.append(b"abcd").unwrap();
    // Size arithmetic overflow on a non-empty buffer.
    assert!(buffer.reserve(usize::MAX).unwrap_err().is_out_of_memory());

    let err = buffer.set_allocator(default_allocator()).unwrap_err();
    assert!(err.is_invalid_state());

    let err = buffer.resize(-1, false).unwrap_err();
    assert!(err.is_invalid_argument());

    assert_eq!(buffer.as_slice(), b"abcd");
    assert_eq!(buffer.capacity(), 4);
}

#[test]
fn test_failed_growth_leaves_buffer_unchanged() {
    let failing = Arc::new(FailingAllocator::new(1));
    let mut buffer = ByteBuffer::with_allocator(failing.clone());
    buffer.append(b"abc").unwrap();
    let ptr = buffer.as_ptr();

    assert!(buffer.append(b"defg").unwrap_err().is_out_of_memory());
    assert!(buffer.append_fill(1, 100).unwrap_err().is_out_of_memory());
    assert!(buffer.resize(64, false).unwrap_err().is_out_of_memory());
    assert!(buffer.resize(1, true).unwrap_err().is_out_of_memory());
    assert!(buffer.append_u64(1).unwrap_err().is_out_of_memory());

    assert_eq!(buffer.as_ptr(), ptr);
    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer.capacity(), 3);
    assert_eq!(buffer.as_slice(), b"abc");

    // Operations that fit the current capacity never reach the allocator.
    buffer.resize(2, false).unwrap();
    buffer.append(b"z").unwrap();
    assert_eq!(buffer.as_slice(), b"abz");

    failing.set_remaining(1);
    buffer.append(b"defg").unwrap();
    assert_eq!(buffer.as_slice(), b"abzdefg");
}

#[test]
fn test_no_leaks_across_lifecycle() {
    let counting = Arc::new(CountingAllocator::new(HeapAllocator));
    {
        let mut buffer = ByteBuffer::with_allocator(counting.clone());
        for i in 0..100u32 {
            buffer.append_u32(i).unwrap();
        }
        // 4 -> 8 -> 16 -> ... doubling keeps the number of reallocations small.
        assert!(counting.reallocations() < 10);
        assert_eq!(counting.live_bytes(), buffer.capacity());

        let mut moved = buffer.take();
        assert_eq!(moved.typed_data::<u32>()[99], 99);
        moved.resize(10, true).unwrap();
        assert_eq!(counting.live_bytes(), 10);

        let mut other = ByteBuffer::with_allocator(counting.clone());
        other.append_fill(7, 50).unwrap();
        moved.move_into(&mut other);
        assert_eq!(counting.live_bytes(), 10);
    }
    assert_eq!(counting.live_bytes(), 0);
    assert_eq!(counting.allocations(), counting.releases());
}

#[test]
fn test_page_allocator_buffer() {
    let page = PageAllocator::page_size();
    let mut buffer = ByteBuffer::with_allocator(Arc::new(PageAllocator));
    for i in 0..(3 * page) {
        buffer.append_u8(i as u8).unwrap();
    }
    assert_eq!(buffer.len(), 3 * page);
    assert!(buffer.iter().enumerate().all(|(i, &b)| b == i as u8));

    buffer.resize(page / 2, true).unwrap();
    assert_eq!(buffer.capacity(), page / 2);
    assert!(buffer.iter().enumerate().all(|(i, &b)| b == i as u8));
}

#[test]
fn test_random_operations_keep_invariants() {
    fastrand::seed(7_340_214);
    let allocators: [SharedAllocator; 3] = [
        default_allocator(),
        Arc::new(RelocatingAllocator),
        Arc::new(PageAllocator),
    ];
    for allocator in allocators {
        let mut buffer = ByteBuffer::with_allocator(allocator);
        let mut shadow: Vec<u8> = Vec::new();
        for _ in 0..2000 {
            match fastrand::u8(0..6) {
                0 => {
                    let bytes: Vec<u8> = (0..fastrand::usize(0..40))
                        .map(|_| fastrand::u8(..))
                        .collect();
                    buffer.append(&bytes).unwrap();
                    shadow.extend_from_slice(&bytes);
                }
                1 => {
                    let value = fastrand::u8(..);
                    let count = fastrand::usize(0..100);
                    buffer.append_fill(value, count).unwrap();
                    shadow.resize(shadow.len() + count, value);
                }
                2 => {
                    let capacity = buffer.capacity();
                    let len = buffer.len();
                    let additional = fastrand::usize(0..200);
                    buffer.reserve(additional).unwrap();
                    assert!(buffer.capacity() >= len + additional);
                    assert!(buffer.capacity() >= capacity);
                    assert_eq!(buffer.len(), len);
                }
                3 => {
                    let new_size = fastrand::usize(0..=shadow.len() + 50);
                    let shrink = fastrand::bool();
                    let capacity = buffer.capacity();
                    buffer.resize(new_size, shrink).unwrap();
                    shadow.resize(new_size, 0);
                    if shrink {
                        assert_eq!(buffer.capacity(), new_size);
                    } else if new_size <= capacity {
                        assert_eq!(buffer.capacity(), capacity);
                    }
                }
                4 => {
                    let value = fastrand::u32(..);
                    buffer.append_u32(value).unwrap();
                    shadow.extend_from_slice(&value.to_ne_bytes());
                }
                _ => {
                    if fastrand::u8(0..10) == 0 {
                        buffer.reset();
                        shadow.clear();
                    }
                }
            }
            assert_invariants(&buffer);
            assert_eq!(buffer.as_slice(), shadow.as_slice());
        }
    }
}

#[test]
fn test_growth_policy_is_configurable() {
    let mut buffer = ByteBuffer::with_growth_policy(GrowthPolicy { growth_factor: 4 }).unwrap();
    buffer.append(b"ab").unwrap();
    buffer.append(b"c").unwrap();
    assert_eq!(buffer.capacity(), 8);
}
