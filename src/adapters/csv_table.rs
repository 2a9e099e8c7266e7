use crate::domain::model::{InputRow, OutputColumns, OutputRow};
use crate::utils::error::{EtlError, Result};

pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// 讀取地址欄位。找不到欄位時在任何 API 呼叫之前就回傳錯誤。
pub fn read_addresses(data: &[u8], address_column: &str) -> Result<Vec<InputRow>> {
    let data = data.strip_prefix(&UTF8_BOM[..]).unwrap_or(data);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let index = headers
        .iter()
        .position(|h| h.trim() == address_column)
        .ok_or_else(|| EtlError::MissingColumnError {
            column: address_column.to_string(),
            available: headers.iter().collect::<Vec<_>>().join(", "),
        })?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        rows.push(InputRow {
            position: i + 1,
            address: record.get(index).unwrap_or_default().to_string(),
        });
    }

    Ok(rows)
}

/// 輸出為帶 BOM 的 UTF-8 CSV，缺少的座標寫成空欄位
pub fn write_rows(rows: &[OutputRow], columns: &OutputColumns) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());

    writer.write_record([
        columns.address.as_str(),
        columns.latitude.as_str(),
        columns.longitude.as_str(),
    ])?;

    for row in rows {
        let latitude = format_coordinate(row.latitude());
        let longitude = format_coordinate(row.longitude());
        writer.write_record([row.address.as_str(), latitude.as_str(), longitude.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// 座標一律帶小數點輸出，整數值寫成 `35.0` 而非 `35`
fn format_coordinate(value: Option<f64>) -> String {
    value
        .map(|v| {
            let text = v.to_string();
            if text.contains('.') || !v.is_finite() {
                text
            } else {
                format!("{}.0", text)
            }
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Coordinates, GeocodeOutcome};

    fn columns() -> OutputColumns {
        OutputColumns {
            address: "住所".to_string(),
            latitude: "緯度".to_string(),
            longitude: "経度".to_string(),
        }
    }

    #[test]
    fn test_read_addresses_tolerates_bom() {
        let mut data = UTF8_BOM.to_vec();
        data.extend_from_slice("名前,住所\n本店,東京都千代田区\n支店,大阪府大阪市\n".as_bytes());

        let rows = read_addresses(&data, "住所").unwrap();

        assert_eq!(
            rows,
            vec![
                InputRow {
                    position: 1,
                    address: "東京都千代田区".to_string()
                },
                InputRow {
                    position: 2,
                    address: "大阪府大阪市".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_read_addresses_without_bom() {
        let rows = read_addresses("住所\n京都府京都市\n".as_bytes(), "住所").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].address, "京都府京都市");
    }

    #[test]
    fn test_read_addresses_missing_column() {
        let err = read_addresses("name,city\nfoo,bar\n".as_bytes(), "住所").unwrap_err();
        match err {
            EtlError::MissingColumnError { column, available } => {
                assert_eq!(column, "住所");
                assert_eq!(available, "name, city");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_addresses_empty_input_has_no_column() {
        assert!(matches!(
            read_addresses(b"", "住所"),
            Err(EtlError::MissingColumnError { .. })
        ));
    }

    #[test]
    fn test_short_rows_become_blank_addresses() {
        let rows = read_addresses("id,住所\n1\n2,横浜市\n".as_bytes(), "住所").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_blank());
        assert_eq!(rows[1].address, "横浜市");
    }

    #[test]
    fn test_whole_number_coordinates_keep_decimal_point() {
        assert_eq!(format_coordinate(Some(35.0)), "35.0");
        assert_eq!(format_coordinate(Some(-139.0)), "-139.0");
        assert_eq!(format_coordinate(Some(0.0)), "0.0");
        assert_eq!(format_coordinate(Some(35.6812)), "35.6812");
        assert_eq!(format_coordinate(Some(0.00005)), "0.00005");
        assert_eq!(format_coordinate(None), "");
    }

    #[test]
    fn test_write_rows_with_bom_and_empty_coordinates() {
        let rows = vec![
            OutputRow {
                address: "東京都千代田区".to_string(),
                outcome: GeocodeOutcome::Resolved(Coordinates {
                    latitude: 35.6812,
                    longitude: 139.7671,
                }),
            },
            OutputRow {
                address: "不明, 住所".to_string(),
                outcome: GeocodeOutcome::NoMatch,
            },
        ];

        let data = write_rows(&rows, &columns()).unwrap();

        assert!(data.starts_with(&UTF8_BOM));
        let text = std::str::from_utf8(&data[UTF8_BOM.len()..]).unwrap();
        assert_eq!(
            text,
            "住所,緯度,経度\n東京都千代田区,35.6812,139.7671\n\"不明, 住所\",,\n"
        );
    }

    #[test]
    fn test_written_output_reads_back_in_order() {
        let rows: Vec<OutputRow> = ["一", "二", "三"]
            .iter()
            .map(|a| OutputRow {
                address: a.to_string(),
                outcome: GeocodeOutcome::Skipped,
            })
            .collect();

        let data = write_rows(&rows, &columns()).unwrap();
        let read_back = read_addresses(&data, "住所").unwrap();

        let addresses: Vec<_> = read_back.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["一", "二", "三"]);
    }
}
