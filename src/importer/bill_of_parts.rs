// ==========================================
// 车队维保系统 - 备件清单解析器
// ==========================================
// 格式: CSV，首行为表头
// 必需列: name, manufacturer, part_number, quantity
// 可选列: vehicle_id
// ==========================================

use crate::domain::part::PartRequirement;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 4] = ["name", "manufacturer", "part_number", "quantity"];

// ==========================================
// BillOfPartsParser - 备件清单解析器
// ==========================================
pub struct BillOfPartsParser;

impl BillOfPartsParser {
    /// 解析 CSV 文件
    pub fn parse_file(&self, file_path: &Path) -> ImportResult<Vec<PartRequirement>> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = file_path.extension() {
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(file_path)?;
        let requirements = self.parse_reader(file)?;
        tracing::info!(
            "备件清单解析完成: file={}, rows={}",
            file_path.display(),
            requirements.len()
        );
        Ok(requirements)
    }

    /// 从任意读取源解析（行号按文件行计，表头为第 1 行）
    pub fn parse_reader<R: Read>(&self, source: R) -> ImportResult<Vec<PartRequirement>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(source);

        // 读取表头（统一小写）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(ImportError::MissingColumn(column.to_string()));
            }
        }

        let mut requirements = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let row = row_idx + 2;

            let mut row_map: HashMap<&str, &str> = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.as_str(), value.trim());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            requirements.push(Self::map_row(row, &row_map)?);
        }

        Ok(requirements)
    }

    fn map_row(row: usize, row_map: &HashMap<&str, &str>) -> ImportResult<PartRequirement> {
        let name = required_field(row_map, row, "name")?;
        let manufacturer = required_field(row_map, row, "manufacturer")?;
        let part_number = required_field(row_map, row, "part_number")?;
        let quantity_raw = required_field(row_map, row, "quantity")?;

        let quantity = quantity_raw
            .parse::<i64>()
            .map_err(|e| ImportError::TypeConversionError {
                row,
                field: "quantity".to_string(),
                message: e.to_string(),
            })?;
        if quantity <= 0 {
            return Err(ImportError::InvalidQuantity { row, value: quantity });
        }

        let requirement = PartRequirement::new(name, manufacturer, part_number, quantity);
        Ok(match row_map.get("vehicle_id") {
            Some(vehicle_id) if !vehicle_id.is_empty() => requirement.for_vehicle(vehicle_id),
            _ => requirement,
        })
    }
}

fn required_field<'a>(
    row_map: &HashMap<&str, &'a str>,
    row: usize,
    field: &str,
) -> ImportResult<&'a str> {
    match row_map.get(field) {
        Some(value) if !value.is_empty() => Ok(*value),
        _ => Err(ImportError::RequiredFieldMissing {
            row,
            field: field.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reader_basic() {
        let csv = "name,manufacturer,part_number,quantity,vehicle_id\n\
                   Oil Filter,Bosch,OF1,5,VIN001\n\
                   ,,,,\n\
                   Air Filter,Mann,AF2,2,\n";

        let requirements = BillOfPartsParser.parse_reader(csv.as_bytes()).unwrap();

        assert_eq!(requirements.len(), 2);
        assert_eq!(requirements[0].name, "Oil Filter");
        assert_eq!(requirements[0].quantity, 5);
        assert_eq!(requirements[0].vehicle_id.as_deref(), Some("VIN001"));
        assert_eq!(requirements[1].part_number, "AF2");
        assert_eq!(requirements[1].vehicle_id, None);
    }

    #[test]
    fn test_headers_are_case_insensitive_and_vehicle_optional() {
        let csv = "Name, Manufacturer ,PART_NUMBER,Quantity\nBelt,Gates,G1,1\n";
        let requirements = BillOfPartsParser.parse_reader(csv.as_bytes()).unwrap();

        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].manufacturer, "Gates");
    }

    #[test]
    fn test_missing_column() {
        let csv = "name,manufacturer,quantity\nBelt,Gates,1\n";
        let err = BillOfPartsParser.parse_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn(c) if c == "part_number"));
    }

    #[test]
    fn test_row_errors_carry_line_number() {
        let csv = "name,manufacturer,part_number,quantity\nBelt,Gates,G1,1\nHose,Gates,H1,abc\n";
        let err = BillOfPartsParser.parse_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { row: 3, .. }));

        let csv = "name,manufacturer,part_number,quantity\nBelt,Gates,G1,0\n";
        let err = BillOfPartsParser.parse_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidQuantity { row: 2, value: 0 }));

        let csv = "name,manufacturer,part_number,quantity\nBelt,,G1,1\n";
        let err = BillOfPartsParser.parse_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::RequiredFieldMissing { row: 2, ref field } if field == "manufacturer"));
    }

    #[test]
    fn test_parse_file_rejects_unknown_path_and_extension() {
        let err = BillOfPartsParser
            .parse_file(Path::new("/nonexistent/bill.csv"))
            .unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));

        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = BillOfPartsParser.parse_file(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ext) if ext == "xlsx"));
    }
}
