use crate::{enums::SortBy, volume::Volume};

use dicom::{
    object::{FileDicomObject, InMemDicomObject, open_file},
    pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder, VoiLutOption},
};
use dicom_dictionary_std::tags;
use nalgebra::{Matrix3, Vector3};
use ndarray::{Array2, Array3, s};
use rayon::prelude::*;
use std::{fs, path::Path};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("No valid DICOM images found")]
    NoValidImages,

    #[error("Inconsistent image dimensions")]
    InconsistentDimensions,

    #[error("Missing spacing information")]
    MissingSpacing,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),
}

/// One decoded frame with the attributes used to order and place it.
struct DecodedSlice {
    order: Option<f64>,
    position: Option<Vector3<f64>>,
    pixels: Array2<f32>,
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from DICOM objects
    ///
    /// Intensities go through the modality LUT, so CT volumes come out in
    /// Hounsfield units. Geometry is taken from Image Orientation (Patient),
    /// Image Position (Patient) and Pixel Spacing; a series without an
    /// orientation is treated as axis aligned.
    ///
    /// # Errors
    ///
    /// Returns error if no valid images found, dimensions are inconsistent or
    /// the spacing cannot be determined
    pub fn load_from_dicom_objects(
        dicom_objects: &[FileDicomObject<InMemDicomObject>],
        sort_by: SortBy,
    ) -> Result<Volume, VolumeLoaderError> {
        let direction = Self::get_direction(dicom_objects).unwrap_or_else(|| {
            warn!("no Image Orientation (Patient) found, assuming identity direction");
            Matrix3::identity()
        });
        let normal = direction.column(2).into_owned();

        let mut slices: Vec<_> = dicom_objects
            .par_iter()
            .filter_map(|dicom_object| Self::decode_slice(dicom_object, sort_by, &normal))
            .collect();

        if slices.is_empty() {
            return Err(VolumeLoaderError::NoValidImages);
        }

        Self::sort_slices(&mut slices, sort_by);
        Self::validate_dimensions(&slices)?;

        let (row_spacing, column_spacing) =
            Self::get_pixel_spacing(dicom_objects).ok_or(VolumeLoaderError::MissingSpacing)?;
        let slice_spacing = Self::get_slice_spacing(&slices, &normal)
            .or_else(|| Self::get_slice_thickness(dicom_objects))
            .ok_or(VolumeLoaderError::MissingSpacing)?;
        let origin = slices[0].position.unwrap_or_else(Vector3::zeros);

        let volume_array = Self::build_volume_array(&slices);
        info!(
            slices = slices.len(),
            spacing = ?[column_spacing, row_spacing, slice_spacing],
            "assembled DICOM volume"
        );

        Ok(
            Volume::new(volume_array, [column_spacing, row_spacing, slice_spacing])
                .with_origin(origin)
                .with_direction(direction),
        )
    }

    /// Load a volume from file paths
    pub fn load_from_file_paths(
        paths: &[impl AsRef<Path> + Sync],
        sort_by: SortBy,
    ) -> Result<Volume, VolumeLoaderError> {
        let objects: Result<Vec<_>, _> = paths
            .par_iter()
            .map(|path| open_file(path.as_ref()))
            .collect();

        Self::load_from_dicom_objects(&objects?, sort_by)
    }

    /// Load a volume from a directory containing .dcm files
    pub fn load_from_directory(
        path: impl AsRef<Path>,
        sort_by: SortBy,
    ) -> Result<Volume, VolumeLoaderError> {
        let paths: Vec<_> = fs::read_dir(path.as_ref())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"))
            })
            .collect();

        if paths.is_empty() {
            return Err(VolumeLoaderError::NoValidImages);
        }
        debug!(files = paths.len(), dir = %path.as_ref().display(), "reading DICOM series");

        Self::load_from_file_paths(&paths, sort_by)
    }

    fn decode_slice(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        sort_by: SortBy,
        normal: &Vector3<f64>,
    ) -> Option<DecodedSlice> {
        let position = Self::get_position(dicom_object);
        let order = Self::get_sort_order(dicom_object, sort_by, position.as_ref(), normal)?;
        let pixels = Self::decode_image(dicom_object)?;
        Some(DecodedSlice {
            order,
            position,
            pixels,
        })
    }

    fn get_sort_order(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        sort_by: SortBy,
        position: Option<&Vector3<f64>>,
        normal: &Vector3<f64>,
    ) -> Option<Option<f64>> {
        match sort_by {
            // Distance along the slice normal, so K grows with the third
            // direction column.
            SortBy::ImagePositionPatient => Some(Some(position?.dot(normal))),
            SortBy::TablePosition => {
                let pos = dicom_object
                    .element(tags::TABLE_POSITION)
                    .ok()?
                    .to_float64()
                    .ok();
                Some(pos)
            }
            SortBy::InstanceNumber => {
                let num = dicom_object
                    .element(tags::INSTANCE_NUMBER)
                    .ok()?
                    .to_int::<i32>()
                    .ok()
                    .map(f64::from);
                Some(num)
            }
            SortBy::None => Some(Some(0.0)),
        }
    }

    fn get_position(dicom_object: &FileDicomObject<InMemDicomObject>) -> Option<Vector3<f64>> {
        let pos = dicom_object
            .element(tags::IMAGE_POSITION_PATIENT)
            .ok()?
            .to_multi_float64()
            .ok()?;
        (pos.len() >= 3).then(|| Vector3::new(pos[0], pos[1], pos[2]))
    }

    /// Direction columns are the row cosine, the column cosine and their
    /// cross product.
    fn get_direction(dicom_objects: &[FileDicomObject<InMemDicomObject>]) -> Option<Matrix3<f64>> {
        dicom_objects.iter().find_map(|dicom_object| {
            let cosines = dicom_object
                .element(tags::IMAGE_ORIENTATION_PATIENT)
                .ok()?
                .to_multi_float64()
                .ok()?;
            if cosines.len() < 6 {
                return None;
            }
            let row = Vector3::new(cosines[0], cosines[1], cosines[2]);
            let column = Vector3::new(cosines[3], cosines[4], cosines[5]);
            Some(Matrix3::from_columns(&[row, column, row.cross(&column)]))
        })
    }

    fn decode_image(dicom_object: &FileDicomObject<InMemDicomObject>) -> Option<Array2<f32>> {
        let pixel_data = dicom_object.decode_pixel_data().ok()?;
        let options = ConvertOptions::new()
            .with_modality_lut(ModalityLutOption::Default)
            .with_voi_lut(VoiLutOption::Identity);
        pixel_data
            .to_ndarray_with_options::<f32>(&options)
            .ok()
            .map(|arr| arr.slice_move(s![0, .., .., 0]))
    }

    fn sort_slices(slices: &mut [DecodedSlice], sort_by: SortBy) {
        if !matches!(sort_by, SortBy::None) {
            slices.sort_by(|a, b| {
                a.order
                    .partial_cmp(&b.order)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }

    fn validate_dimensions(slices: &[DecodedSlice]) -> Result<(), VolumeLoaderError> {
        let first_dim = slices[0].pixels.dim();
        if slices.iter().any(|slice| slice.pixels.dim() != first_dim) {
            return Err(VolumeLoaderError::InconsistentDimensions);
        }
        Ok(())
    }

    fn build_volume_array(slices: &[DecodedSlice]) -> Array3<f32> {
        let (height, width) = slices[0].pixels.dim();
        let depth = slices.len();
        let mut volume = Array3::<f32>::zeros((depth, height, width));

        for (i, slice) in slices.iter().enumerate() {
            volume.slice_mut(s![i, .., ..]).assign(&slice.pixels);
        }

        volume
    }

    /// Pixel Spacing holds (row spacing, column spacing): the distance between
    /// rows runs along J, the distance between columns along I.
    fn get_pixel_spacing(
        dicom_objects: &[FileDicomObject<InMemDicomObject>],
    ) -> Option<(f64, f64)> {
        dicom_objects.iter().find_map(|dicom_object| {
            let pixel_spacing = dicom_object
                .element(tags::PIXEL_SPACING)
                .ok()?
                .to_multi_float64()
                .ok()?;
            (pixel_spacing.len() >= 2).then(|| (pixel_spacing[0], pixel_spacing[1]))
        })
    }

    /// Distance between the first two slices along the normal.
    fn get_slice_spacing(slices: &[DecodedSlice], normal: &Vector3<f64>) -> Option<f64> {
        let first = slices.first()?.position?;
        let second = slices.get(1)?.position?;
        let spacing = (second - first).dot(normal).abs();
        (spacing > 0.0).then_some(spacing)
    }

    fn get_slice_thickness(dicom_objects: &[FileDicomObject<InMemDicomObject>]) -> Option<f64> {
        dicom_objects.iter().find_map(|dicom_object| {
            dicom_object
                .element(tags::SLICE_THICKNESS)
                .ok()?
                .to_float64()
                .ok()
        })
    }
}
