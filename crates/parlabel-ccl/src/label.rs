//! Host-level labeling
//!
//! Convenience wrappers that allocate device buffers, upload a [`Mask`],
//! run [`bwlabel`] and download the result as a [`LabelImage`].

use crate::bwlabel::{LabelBuffers, LabelReport, bwlabel};
use crate::config::LabelConfig;
use crate::connectivity::Connectivity;
use crate::error::LabelResult;
use parlabel_core::{Foreground, LabelImage, Mask};
use parlabel_device::{CpuDevice, Device, DeviceScalar};
use std::sync::OnceLock;

static DEFAULT_DEVICE: OnceLock<CpuDevice> = OnceLock::new();

/// Process-wide [`CpuDevice`] used by [`label`] and [`count_components`]
///
/// Created on first use with one worker per core and kept for the life of
/// the process. A failed creation is returned and retried on the next call.
pub fn default_device() -> LabelResult<&'static CpuDevice> {
    if let Some(device) = DEFAULT_DEVICE.get() {
        return Ok(device);
    }
    let device = CpuDevice::new()?;
    Ok(DEFAULT_DEVICE.get_or_init(|| device))
}

/// Label connected components on the shared [`default_device`]
///
/// # Arguments
///
/// * `mask` - Input mask, nonzero pixels are foreground
/// * `connectivity` - Connectivity type (4-way or 8-way)
///
/// # Returns
///
/// A labeled image where each pixel holds its 1-based component id.
pub fn label<T>(mask: &Mask<T>, connectivity: Connectivity) -> LabelResult<LabelImage>
where
    T: Foreground + DeviceScalar,
{
    label_with(default_device()?, mask, connectivity, &LabelConfig::default())
}

/// Label connected components on a given device
pub fn label_with<D, T>(
    device: &D,
    mask: &Mask<T>,
    connectivity: Connectivity,
    config: &LabelConfig,
) -> LabelResult<LabelImage>
where
    D: Device,
    T: Foreground + DeviceScalar,
{
    label_with_report(device, mask, connectivity, config).map(|(image, _)| image)
}

/// Label connected components and return the run summary as well
pub fn label_with_report<D, T>(
    device: &D,
    mask: &Mask<T>,
    connectivity: Connectivity,
    config: &LabelConfig,
) -> LabelResult<(LabelImage, LabelReport)>
where
    D: Device,
    T: Foreground + DeviceScalar,
{
    let numel = mask.len();
    let mask_buf = device.upload(mask.data())?;
    let labels = device.alloc::<u32>(numel)?;
    let packing = device.alloc::<u32>(numel)?;
    let out_final = device.alloc::<f64>(numel)?;
    let out_count = device.alloc::<f64>(1)?;

    let buffers = LabelBuffers {
        out_final: &out_final,
        out_count: &out_count,
        labels: &labels,
        packing: &packing,
        mask: &mask_buf,
    };
    let report = bwlabel(
        device,
        &buffers,
        connectivity.neighborhood(),
        mask.width(),
        mask.height(),
        config,
    )?;

    let image = LabelImage::new(
        mask.width(),
        mask.height(),
        out_final.to_host(),
        report.num_components,
    )?;
    Ok((image, report))
}

/// Count the connected components of `mask`
pub fn count_components<T>(mask: &Mask<T>, connectivity: Connectivity) -> LabelResult<u32>
where
    T: Foreground + DeviceScalar,
{
    Ok(label(mask, connectivity)?.num_components())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_components() {
        let mask = Mask::from_ascii(
            "
            ##........
            .....##...
            ........#.
            ",
        )
        .unwrap();
        assert_eq!(count_components(&mask, Connectivity::Four).unwrap(), 3);
        assert_eq!(count_components(&mask, Connectivity::Eight).unwrap(), 3);
    }

    #[test]
    fn test_numeric_mask() {
        let mask = Mask::from_vec(3, 1, vec![0.5f32, 0.0, 2.0]).unwrap();
        let labeled = label(&mask, Connectivity::Four).unwrap();
        assert_eq!(labeled.to_u32(), vec![1, 0, 2]);
    }

    #[test]
    fn test_default_device_shared() {
        let a = default_device().unwrap();
        let b = default_device().unwrap();
        assert!(std::ptr::eq(a, b));

        let mask = Mask::from_ascii("X.X").unwrap();
        let before = a.stats().launches;
        assert_eq!(count_components(&mask, Connectivity::Four).unwrap(), 2);
        assert!(a.stats().launches > before);
    }

    #[test]
    fn test_report() {
        let device = CpuDevice::with_threads(2).unwrap();
        let mask = Mask::from_ascii("###\n#.#\n###").unwrap();
        let (image, report) =
            label_with_report(&device, &mask, Connectivity::Four, &LabelConfig::default())
                .unwrap();
        assert_eq!(image.num_components(), 1);
        assert_eq!(report.num_components, 1);
        assert!(report.passes >= 1);
        assert_eq!(report.readbacks, report.passes);
        // initialize + 2 per pass + 4 compaction/finalize launches
        assert_eq!(report.launches, 1 + 2 * report.passes + 4);
        assert!(!report.folded);
    }
}
