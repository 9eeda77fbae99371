use chrono::NaiveDate;
use demand_forecast::inventory::{decide, OUTPUT_COLUMNS};
use demand_forecast::{
    CostParams, FeatureRow, ForecastError, PredictionRow, RecommendationRecord,
    RecommendationTable,
};
use proptest::prelude::*;
use rstest::rstest;
use tempfile::NamedTempFile;

fn prediction(store_id: i64, sales: f64, predicted_sales: f64) -> PredictionRow {
    PredictionRow {
        features: FeatureRow {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            store_id,
            item_id: 101,
            sales,
            dayofweek: 4,
            week: 9,
            month: 3,
            lag_1: sales,
            lag_7: sales,
            lag_14: sales,
            rolling_mean_7: sales,
            rolling_std_7: 1.0,
        },
        predicted_sales,
    }
}

#[rstest]
#[case(0.5, 0.0)]
#[case(1.5, 2.0)]
#[case(2.5, 2.0)]
#[case(3.5, 4.0)]
#[case(20.49, 20.0)]
#[case(20.51, 21.0)]
fn test_rounding_is_half_to_even(#[case] predicted: f64, #[case] expected: f64) {
    let rows = decide(&[prediction(1, 0.0, predicted)], 0.0, 1.0, 1.0).unwrap();
    assert_eq!(rows[0].recommended_inventory, expected);
}

#[test]
fn test_safety_stock_is_added_before_rounding() {
    // 19.3 + 1.2 = 20.5 -> 20
    let rows = decide(&[prediction(1, 20.0, 19.3)], 1.2, 10.0, 2.0).unwrap();
    assert_eq!(rows[0].recommended_inventory, 20.0);
    assert_eq!(rows[0].estimated_cost, 0.0);
}

#[test]
fn test_rows_keep_order_and_predictions() {
    let input = vec![
        prediction(3, 10.0, 12.0),
        prediction(1, 30.0, 25.0),
        prediction(2, 5.0, 5.0),
    ];
    let rows = decide(&input, 0.0, 10.0, 2.0).unwrap();

    let stores: Vec<i64> = rows.iter().map(|r| r.store_id()).collect();
    assert_eq!(stores, vec![3, 1, 2]);
    assert_eq!(rows[1].prediction, input[1]);
    assert_eq!(rows[1].estimated_cost, 50.0);
    assert_eq!(rows[0].estimated_cost, 4.0);
}

#[test]
fn test_infinite_prediction_is_rejected() {
    let result = decide(&[prediction(1, 10.0, f64::INFINITY)], 0.0, 10.0, 2.0);
    assert!(matches!(result, Err(ForecastError::InvalidInputError(_))));
}

#[test]
fn test_empty_input_decides_nothing() {
    let table = RecommendationTable::decide(&[], 3.0, CostParams::default()).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.total_estimated_cost(), 0.0);
    assert_eq!(table.to_dataframe().unwrap().height(), 0);
}

#[test]
fn test_dataframe_projection() {
    let table = RecommendationTable::decide(
        &[prediction(1, 20.0, 18.0), prediction(2, 7.0, 9.0)],
        0.0,
        CostParams::new(10.0, 2.0).unwrap(),
    )
    .unwrap();

    let df = table.to_dataframe().unwrap();
    assert_eq!(df.get_column_names(), OUTPUT_COLUMNS.to_vec());
    assert_eq!(df.height(), 2);

    let costs: Vec<Option<f64>> = df
        .column("estimated_cost")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(costs, vec![Some(20.0), Some(4.0)]);
}

#[test]
fn test_csv_export_round_trips_projection() {
    let table = RecommendationTable::decide(
        &[prediction(1, 20.0, 18.0), prediction(2, 7.0, 9.0)],
        0.0,
        CostParams::default(),
    )
    .unwrap();

    let file = NamedTempFile::new().unwrap();
    table.write_csv(file.path()).unwrap();

    let mut reader = csv::Reader::from_path(file.path()).unwrap();
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(String::from)
        .collect();
    assert_eq!(headers, OUTPUT_COLUMNS.to_vec());

    let records: Vec<RecommendationRecord> =
        reader.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(records, table.records());
}

#[test]
fn test_csv_export_of_empty_table_has_header() {
    let table = RecommendationTable::decide(&[], 0.0, CostParams::default()).unwrap();
    let mut buffer = Vec::new();
    table.write_csv_to(&mut buffer).unwrap();

    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        "store_id,item_id,sales,predicted_sales,recommended_inventory,estimated_cost\n"
    );
}

proptest! {
    #[test]
    fn prop_at_most_one_side_is_nonzero(
        sales in 0.0f64..500.0,
        predicted in 0.0f64..500.0,
        safety_stock in 0.0f64..50.0,
        understock_cost in 0.0f64..20.0,
        overstock_cost in 0.0f64..20.0,
    ) {
        let rows = decide(
            &[prediction(1, sales, predicted)],
            safety_stock,
            understock_cost,
            overstock_cost,
        )
        .unwrap();
        let row = &rows[0];

        prop_assert!(row.understock_units >= 0.0 && row.overstock_units >= 0.0);
        prop_assert!(row.understock_units == 0.0 || row.overstock_units == 0.0);
        if row.recommended_inventory == sales {
            prop_assert_eq!(row.understock_units, 0.0);
            prop_assert_eq!(row.overstock_units, 0.0);
        }
        let expected =
            row.understock_units * understock_cost + row.overstock_units * overstock_cost;
        prop_assert_eq!(row.estimated_cost, expected);
    }

    #[test]
    fn prop_more_safety_stock_never_lowers_inventory(
        sales in 0.0f64..500.0,
        predicted in 0.0f64..500.0,
        low in 0.0f64..50.0,
        extra in 0.0f64..50.0,
    ) {
        let high = low + extra;
        let input = [prediction(1, sales, predicted)];
        let a = decide(&input, low, 10.0, 2.0).unwrap().remove(0);
        let b = decide(&input, high, 10.0, 2.0).unwrap().remove(0);

        prop_assert!(a.recommended_inventory <= b.recommended_inventory);
        if a.recommended_inventory >= sales {
            prop_assert!(a.estimated_cost <= b.estimated_cost);
        }
    }
}
