// demos/dam_series.rs
use chrono::NaiveDate;
use wis_scraper::{Wis, WisError};

fn main() -> Result<(), WisError> {
    env_logger::init();

    let (Some(start), Some(end)) = (
        NaiveDate::from_ymd_opt(2023, 6, 1),
        NaiveDate::from_ymd_opt(2023, 7, 31),
    ) else {
        return Ok(());
    };

    let wis = Wis::new()?;
    // 矢木沢ダム
    let series = wis
        .dam_series()
        .dam_id("1368030375010")
        .start(start)
        .end(end)
        .verbose(true)
        .sentinel("NaN")
        .report_non_numeric(true)
        .call()?;

    if let Some(metadata) = &series.metadata {
        println!("Location: {:?}", metadata.point());
    }
    if let Some(literals) = &series.non_numeric_values {
        println!("Non-numeric cells replaced: {:?}", literals);
    }

    match &series.table {
        Some(table) => {
            let df = table.to_float_dataframe()?;
            println!("Shape: {:?}", df.shape());
            println!("{}", df.tail(Some(5)));
            if let Some(headed) = series.to_portal_dataframe()? {
                println!("{}", headed.head(Some(3)));
            }
        }
        None => println!("No data between {} and {}", start, end),
    }

    Ok(())
}
