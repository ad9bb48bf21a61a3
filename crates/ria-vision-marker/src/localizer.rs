use ria_vision_core::{FrameStamp, GrayImageView};

use crate::{LocalizeError, MarkerCandidate};

/// External marker localization (for example an ArUco quad detector).
///
/// Given the grayscale version of the current color frame, return zero or
/// more candidates with four corners each, ordered TL, TR, BR, BL.
pub trait MarkerLocalizer {
    fn locate(
        &mut self,
        image: &GrayImageView<'_>,
        stamp: FrameStamp,
    ) -> Result<Vec<MarkerCandidate>, LocalizeError>;
}

impl<F> MarkerLocalizer for F
where
    F: FnMut(&GrayImageView<'_>, FrameStamp) -> Result<Vec<MarkerCandidate>, LocalizeError>,
{
    fn locate(
        &mut self,
        image: &GrayImageView<'_>,
        stamp: FrameStamp,
    ) -> Result<Vec<MarkerCandidate>, LocalizeError> {
        self(image, stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkerDetector;
    use nalgebra::Point2;
    use ria_vision_core::{FramePair, Grid, Rgb};

    fn bright_pixels_as_marker(
        image: &GrayImageView<'_>,
        _stamp: FrameStamp,
    ) -> Result<Vec<MarkerCandidate>, LocalizeError> {
        if image.get(0, 0) < 128 {
            return Ok(Vec::new());
        }
        Ok(vec![MarkerCandidate {
            id: 1,
            corners: vec![
                Point2::new(2.0, 2.0),
                Point2::new(6.0, 2.0),
                Point2::new(6.0, 6.0),
                Point2::new(2.0, 6.0),
            ],
        }])
    }

    fn frame(color: Rgb) -> FramePair {
        let depth = Grid::filled(10, 10, 750u16).expect("depth");
        let color = Grid::filled(10, 10, color).expect("color");
        FramePair::new(FrameStamp::default(), depth, color).expect("frame")
    }

    #[test]
    fn plain_functions_act_as_localizers() {
        let mut localizer = bright_pixels_as_marker;
        let detector = MarkerDetector::new();

        let found = detector
            .locate_and_detect(&frame(Rgb::WHITE), &mut localizer)
            .expect("bright frame");
        assert_eq!(found.observation.id, 1);
        assert_eq!(found.observation.distance_m, 0.75);

        let err = detector
            .locate_and_detect(&frame(Rgb::BLACK), &mut localizer)
            .unwrap_err();
        assert_eq!(err, crate::MarkerDetectError::NotFound);
    }
}
