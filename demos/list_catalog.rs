// demos/list_catalog.rs
use wis_scraper::{StationKind, Wis, WisError};

fn main() -> Result<(), WisError> {
    // Set RUST_LOG=info (or debug) to follow the page walk
    env_logger::init();

    let wis = Wis::new()?;
    let watersheds = wis.list_watersheds()?;
    println!("{} watersheds", watersheds.len());

    let Some(tone) = watersheds.iter().find(|w| w.name == "利根川") else {
        eprintln!("Tone watershed not listed");
        return Ok(());
    };

    let gauges = wis
        .list_stations()
        .kind(StationKind::WaterLevelFlow)
        .watershed_id(tone.id.clone())
        .verbose(true)
        .geospatial(true)
        .call()?;

    println!("{}", gauges.to_dataframe()?.head(Some(10)));
    let located = gauges.points().iter().filter(|p| p.is_some()).count();
    println!("{} of {} gauges have coordinates", located, gauges.len());

    match gauges.to_geojson() {
        Ok(geojson) => println!("GeoJSON: {} bytes", geojson.to_string().len()),
        Err(e) => eprintln!("Failed to serialize GeoJSON: {}", e),
    }

    Ok(())
}
