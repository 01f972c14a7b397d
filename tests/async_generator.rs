use base64::Engine as _;
use pwaicons::{
    catalog, Category, IconGenerator, IconKind, RasterConfig, Rgb, SizeSpec, VectorSource,
};

const FIXTURE: &str = "tests/fixtures/logo.svg";

#[tokio::test]
async fn generates_full_catalog_from_path() {
    let generator = IconGenerator::new(RasterConfig::default()).unwrap();
    let results = generator
        .generate(VectorSource::from_path(FIXTURE), catalog::catalog())
        .await
        .expect("generation failed");
    assert_eq!(results.len(), 10);
    for (result, spec) in results.iter().zip(catalog::catalog()) {
        assert_eq!(result.spec, *spec);
        assert_eq!(&result.png_data[0..8], b"\x89PNG\r\n\x1a\n");
    }
}

#[tokio::test]
async fn data_url_source_matches_path_source() {
    let svg = std::fs::read(FIXTURE).unwrap();
    let url = format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&svg)
    );
    let generator = IconGenerator::new(RasterConfig::default()).unwrap();
    let spec = SizeSpec::new(32, IconKind::Favicon);

    let from_url = generator
        .rasterize(VectorSource::parse(&url).unwrap(), spec)
        .await
        .unwrap();
    let from_path = generator
        .rasterize(VectorSource::from_path(FIXTURE), spec)
        .await
        .unwrap();
    assert_eq!(from_url, from_path);
}

#[tokio::test]
async fn single_permit_still_completes_every_task() {
    let generator = IconGenerator::new(RasterConfig { jobs: 1, ..Default::default() }).unwrap();
    let specs: Vec<SizeSpec> = catalog::by_category(Category::Favicon).collect();
    let results = generator
        .generate(VectorSource::from_path(FIXTURE), &specs)
        .await
        .unwrap();
    let dims: Vec<u32> = results.iter().map(|r| r.dimension()).collect();
    assert_eq!(dims, vec![16, 32, 48]);
}

#[tokio::test]
async fn background_colour_changes_output() {
    let white = IconGenerator::new(RasterConfig::default()).unwrap();
    let cfg = RasterConfig { background: Rgb(0, 0, 0), ..Default::default() };
    let black = IconGenerator::new(cfg).unwrap();
    let spec = catalog::catalog()[4];
    let a = white.rasterize(VectorSource::from_path(FIXTURE), spec).await.unwrap();
    let b = black.rasterize(VectorSource::from_path(FIXTURE), spec).await.unwrap();
    assert_ne!(a.sha256_hex(), b.sha256_hex());
}

#[tokio::test]
async fn generators_can_be_shared_across_tasks() {
    let generator = IconGenerator::new(RasterConfig::default()).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let generator = generator.clone();
            tokio::spawn(async move {
                generator
                    .rasterize(VectorSource::from_path(FIXTURE), catalog::catalog()[7])
                    .await
            })
        })
        .collect();

    let mut digests = Vec::new();
    for handle in handles {
        digests.push(handle.await.unwrap().unwrap().sha256_hex());
    }
    digests.dedup();
    assert_eq!(digests.len(), 1);
}
