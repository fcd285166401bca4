// Minimum number of slots in a freshly expanded block.
pub const DEFAULT_BLOCK_SIZE: usize = 16;

// Distinct addresses are needed for every slot, so zero sized values
// still occupy `align_of` bytes.
pub const fn slot_stride(size: usize, align: usize) -> usize {
    if size == 0 {
        align
    } else {
        size
    }
}
