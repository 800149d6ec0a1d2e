//! Tests for image source loading, decoding and the resolution time limit

#[cfg(test)]
mod tests {
    use image::{ImageFormat, Rgba, RgbaImage};
    use layerforge::io::error::ResolutionFailure;
    use layerforge::model::layer::ImageSource;
    use layerforge::render::loader::{ImageLoader, SourceLoader, decode_to_fit, resolve_image};
    use std::future::Future;
    use std::io::Cursor;
    use std::time::Duration;

    struct StallingLoader;

    impl ImageLoader for StallingLoader {
        fn load(
            &self,
            _source: &ImageSource,
        ) -> impl Future<Output = Result<Vec<u8>, ResolutionFailure>> + Send {
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Vec::new())
            }
        }
    }

    fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(width, height, Rgba(color))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("in-memory PNG encoding succeeds");
        bytes
    }

    // Tests images are stretched to the requested size
    // Verified by returning the decoded image unscaled
    #[test]
    fn test_decode_to_fit_stretches() {
        let image = decode_to_fit(&png(2, 3, [10, 20, 30, 255]), 8, 6).expect("decodes");

        assert_eq!(image.dimensions(), (8, 6));
        let Rgba(corner) = *image.get_pixel(7, 5);
        for (channel, expected) in corner.iter().zip([10u8, 20, 30, 255]) {
            assert!(channel.abs_diff(expected) <= 1, "{corner:?}");
        }
    }

    // Tests garbage bytes are a decode error
    // Verified by returning an empty image for undecodable input
    #[test]
    fn test_decode_to_fit_rejects_garbage() {
        assert!(decode_to_fit(b"definitely not an image", 4, 4).is_err());
    }

    // Tests embedded and file sources load their bytes
    // Verified by returning empty bytes for file sources
    #[tokio::test]
    async fn test_source_loader_embedded_and_path() {
        let loader = SourceLoader::new();
        let bytes = png(1, 1, [0, 0, 0, 255]);

        let embedded = loader
            .load(&ImageSource::embedded(bytes.clone()))
            .await
            .expect("embedded bytes load");
        assert_eq!(embedded, bytes);

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("a.png");
        std::fs::write(&path, &bytes).expect("fixture is written");
        let from_disk = loader
            .load(&ImageSource::Path(path))
            .await
            .expect("file loads");
        assert_eq!(from_disk, bytes);
    }

    // Tests a missing file is an io failure naming the path
    // Verified by mapping read errors to fetch failures
    #[tokio::test]
    async fn test_source_loader_missing_file() {
        let loader = SourceLoader::new();

        let result = loader
            .load(&ImageSource::Path("does/not/exist.png".into()))
            .await;

        assert!(matches!(
            result,
            Err(ResolutionFailure::Io { ref location, .. }) if location.contains("exist.png")
        ));
    }

    // Tests resolution is abandoned once the time limit passes
    // Verified by awaiting the loader without a limit
    #[tokio::test]
    async fn test_resolve_image_timeout() {
        let source = ImageSource::Path("slow.png".into());

        let result =
            resolve_image(&StallingLoader, &source, (4, 4), Duration::from_millis(20)).await;

        assert!(matches!(
            result,
            Err(ResolutionFailure::Timeout { after, .. }) if after == Duration::from_millis(20)
        ));
    }

    // Tests undecodable bytes surface as a decode failure
    // Verified by skipping the decode step
    #[tokio::test]
    async fn test_resolve_image_decode_failure() {
        let source = ImageSource::embedded(b"garbage".to_vec());

        let result =
            resolve_image(&SourceLoader::new(), &source, (4, 4), Duration::from_secs(5)).await;

        assert!(matches!(result, Err(ResolutionFailure::Decode { .. })));
    }

    // Tests a resolved image has the output dimensions
    // Verified by resolving at the source size
    #[tokio::test]
    async fn test_resolve_image_success() {
        let source = ImageSource::embedded(png(3, 3, [1, 2, 3, 255]));

        let image = resolve_image(&SourceLoader::new(), &source, (6, 10), Duration::from_secs(5))
            .await
            .expect("image resolves");

        assert_eq!(image.dimensions(), (6, 10));
    }
}
