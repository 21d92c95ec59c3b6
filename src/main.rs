use dicom_stack::catalog::CatalogClient;
use dicom_stack::stack_resolver::{ResolveOptions, StackResolver};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(base_url), Some(study)) = (args.next(), args.next()) else {
        eprintln!("usage: dicom-stack <dicomweb-base-url> <study-uid> [series-uid]");
        std::process::exit(2);
    };

    let catalog = CatalogClient::new(&base_url).expect("should have built the catalog client");

    let series = match args.next() {
        Some(series) => series,
        None => {
            let listed = catalog
                .list_series(&study)
                .await
                .expect("should have listed the study's series");
            for summary in &listed {
                println!(
                    "series {} [{}] {}",
                    summary.series_uid,
                    summary.modality.as_deref().unwrap_or("??"),
                    summary.description.as_deref().unwrap_or("")
                );
            }
            listed
                .first()
                .expect("study should contain at least one series")
                .series_uid
                .clone()
        }
    };

    let resolved = StackResolver::resolve(&catalog, &study, &series, &ResolveOptions::default())
        .await
        .expect("should have resolved the series into a stack");

    println!(
        "{} instances ordered by {:?}:",
        resolved.stack.len(),
        resolved.stack.strategy()
    );
    for (position, id) in resolved.stack.ids().iter().enumerate() {
        println!("{:>4}  {id}", position + 1);
    }
}
