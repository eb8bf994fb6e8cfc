//! Sequential reference labeling
//!
//! Breadth-first flood fill started from each unlabeled foreground pixel in
//! raster order. Components are therefore numbered by their lowest linear
//! index, which is the same numbering the parallel pipeline produces, so the
//! two outputs can be compared pixel for pixel.

use crate::connectivity::Connectivity;
use crate::error::LabelResult;
use parlabel_core::{Foreground, LabelImage, Mask};
use std::collections::VecDeque;

/// Label `mask` sequentially
pub fn label_sequential<T: Foreground>(
    mask: &Mask<T>,
    connectivity: Connectivity,
) -> LabelResult<LabelImage> {
    let width = mask.width();
    let height = mask.height();
    let data = mask.data();
    let mut labels = vec![0u32; data.len()];
    let mut queue = VecDeque::new();
    let mut next = 0u32;

    for start in 0..data.len() {
        if labels[start] != 0 || !data[start].is_foreground() {
            continue;
        }
        next += 1;
        labels[start] = next;
        queue.push_back(start);

        while let Some(i) = queue.pop_front() {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            for &(dx, dy) in connectivity.offsets() {
                let (Some(xn), Some(yn)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    continue;
                };
                if xn >= width || yn >= height {
                    continue;
                }
                let j = yn as usize * width as usize + xn as usize;
                if labels[j] == 0 && data[j].is_foreground() {
                    labels[j] = next;
                    queue.push_back(j);
                }
            }
        }
    }

    let labels = labels.into_iter().map(f64::from).collect();
    Ok(LabelImage::new(width, height, labels, next)?)
}
