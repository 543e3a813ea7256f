use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::product::{BatchMeta, ProductBatch, ProductRecord, SalesMetrics};
use crate::domain::types::{DataFidelity, SheetFormat};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::ProductRepository;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

// ==========================================
// SqliteProductRepository - SQLite 批次仓储
// ==========================================
/// 职责: 管理 product_batch / product_record 表
/// 替换: 单事务内 DELETE + INSERT，其他连接只能看到提交前或提交后的完整批次
pub struct SqliteProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProductRepository {
    /// 打开数据库并确保表结构
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn invalid_enum(column: usize, value: &str) -> rusqlite::Error {
    conversion_error(
        column,
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("无法识别的枚举值: {}", value),
        ),
    )
}

fn map_meta(row: &Row<'_>) -> rusqlite::Result<BatchMeta> {
    let format_raw: String = row.get(2)?;
    let imported_raw: String = row.get(6)?;

    Ok(BatchMeta {
        batch_id: row.get(0)?,
        file_name: row.get(1)?,
        format: SheetFormat::from_db_str(&format_raw).ok_or_else(|| invalid_enum(2, &format_raw))?,
        anchor_date: row.get(3)?,
        record_count: row.get::<_, i64>(4)? as usize,
        skipped_rows: row.get::<_, i64>(5)? as usize,
        imported_at: DateTime::parse_from_rfc3339(&imported_raw)
            .map_err(|e| conversion_error(6, e))?
            .with_timezone(&Utc),
    })
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<ProductRecord> {
    let daily_json: String = row.get(5)?;
    let daily_stock: BTreeMap<String, f64> =
        serde_json::from_str(&daily_json).map_err(|e| conversion_error(5, e))?;
    let fidelity_raw: String = row.get(10)?;

    Ok(ProductRecord {
        brand_name: row.get(0)?,
        product_id: row.get(1)?,
        index_number: row.get(2)?,
        wholesale_rate: row.get(3)?,
        selling_rate: row.get(4)?,
        daily_stock,
        anchor_date: row.get(6)?,
        anchor_stock: row.get(7)?,
        last_date: row.get(8)?,
        last_stock: row.get(9)?,
        fidelity: DataFidelity::from_db_str(&fidelity_raw)
            .ok_or_else(|| invalid_enum(10, &fidelity_raw))?,
        metrics: SalesMetrics {
            total_sales_qty: row.get(11)?,
            days_analyzed: row.get::<_, i64>(12)? as u32,
            avg_daily_sales_qty: row.get(13)?,
            monthly_sales_qty: row.get(14)?,
            monthly_sales_value: row.get(15)?,
            current_stock_qty: row.get(16)?,
            stock_value_today: row.get(17)?,
            stock_value_at_anchor: row.get(18)?,
            stock_ratio: row.get(19)?,
            stock_available_days: row.get(20)?,
        },
    })
}

impl ProductRepository for SqliteProductRepository {
    #[instrument(skip(self, batch), fields(batch_id = %batch.meta.batch_id, records = batch.len()))]
    fn replace_all(&self, batch: &ProductBatch) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        // product_record 随 product_batch 级联删除
        tx.execute("DELETE FROM product_record", [])?;
        tx.execute("DELETE FROM product_batch", [])?;

        let meta = &batch.meta;
        tx.execute(
            r#"
            INSERT INTO product_batch (
                batch_id, file_name, format, anchor_date,
                record_count, skipped_rows, imported_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                meta.batch_id,
                meta.file_name,
                meta.format.to_string(),
                meta.anchor_date,
                meta.record_count as i64,
                meta.skipped_rows as i64,
                meta.imported_at.to_rfc3339(),
            ],
        )?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO product_record (
                    batch_id, seq, brand_name, product_id, index_number,
                    wholesale_rate, selling_rate, daily_stock_json,
                    anchor_date, anchor_stock, last_date, last_stock, fidelity,
                    total_sales_qty, days_analyzed, avg_daily_sales_qty,
                    monthly_sales_qty, monthly_sales_value, current_stock_qty,
                    stock_value_today, stock_value_at_anchor, stock_ratio,
                    stock_available_days
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                    ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23
                )
                "#,
            )?;

            for (seq, record) in batch.records.iter().enumerate() {
                let m = &record.metrics;
                stmt.execute(params![
                    meta.batch_id,
                    seq as i64,
                    record.brand_name,
                    record.product_id,
                    record.index_number,
                    record.wholesale_rate,
                    record.selling_rate,
                    serde_json::to_string(&record.daily_stock)?,
                    record.anchor_date,
                    record.anchor_stock,
                    record.last_date,
                    record.last_stock,
                    record.fidelity.to_string(),
                    m.total_sales_qty,
                    m.days_analyzed as i64,
                    m.avg_daily_sales_qty,
                    m.monthly_sales_qty,
                    m.monthly_sales_value,
                    m.current_stock_qty,
                    m.stock_value_today,
                    m.stock_value_at_anchor,
                    m.stock_ratio,
                    m.stock_available_days,
                ])?;
                count += 1;
            }
        }

        tx.commit()?;
        debug!(count = count, "批次替换完成");
        Ok(count)
    }

    fn read_all(&self) -> RepositoryResult<Vec<ProductRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                brand_name, product_id, index_number, wholesale_rate, selling_rate,
                daily_stock_json, anchor_date, anchor_stock, last_date, last_stock,
                fidelity, total_sales_qty, days_analyzed, avg_daily_sales_qty,
                monthly_sales_qty, monthly_sales_value, current_stock_qty,
                stock_value_today, stock_value_at_anchor, stock_ratio,
                stock_available_days
            FROM product_record
            ORDER BY seq
            "#,
        )?;

        let records = stmt
            .query_map([], map_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn current_batch_meta(&self) -> RepositoryResult<Option<BatchMeta>> {
        let conn = self.get_conn()?;
        let meta = conn
            .query_row(
                r#"
                SELECT batch_id, file_name, format, anchor_date,
                       record_count, skipped_rows, imported_at
                FROM product_batch
                LIMIT 1
                "#,
                [],
                map_meta,
            )
            .optional()?;
        Ok(meta)
    }

    fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM product_record", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::configure_sqlite_connection;

    fn repo() -> SqliteProductRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        SqliteProductRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn batch(id: &str, brands: &[&str]) -> ProductBatch {
        let records = brands
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let mut daily_stock = BTreeMap::new();
                daily_stock.insert("25-Aug".to_string(), 100.0);
                daily_stock.insert("26-Aug".to_string(), 90.0);
                ProductRecord {
                    brand_name: b.to_string(),
                    product_id: format!("ID_{}", i + 1),
                    index_number: i as i64 + 1,
                    wholesale_rate: 45.0,
                    selling_rate: 50.0,
                    daily_stock,
                    anchor_date: Some("25-Aug".to_string()),
                    anchor_stock: 100.0,
                    last_date: Some("26-Aug".to_string()),
                    last_stock: 90.0,
                    fidelity: DataFidelity::TimeSeries,
                    metrics: SalesMetrics {
                        total_sales_qty: 10.0,
                        days_analyzed: 1,
                        avg_daily_sales_qty: 10.0,
                        monthly_sales_qty: 240.0,
                        monthly_sales_value: 12000.0,
                        current_stock_qty: 90,
                        stock_value_today: 4500.0,
                        stock_value_at_anchor: 5000.0,
                        stock_ratio: 0.375,
                        stock_available_days: 9.0,
                    },
                }
            })
            .collect::<Vec<_>>();

        ProductBatch {
            meta: BatchMeta {
                batch_id: id.to_string(),
                file_name: "stock.csv".to_string(),
                format: SheetFormat::Tabular,
                anchor_date: Some("25-Aug".to_string()),
                record_count: records.len(),
                skipped_rows: 0,
                imported_at: Utc::now(),
            },
            records,
        }
    }

    #[test]
    fn test_replace_and_read_back() {
        let repo = repo();
        let original = batch("b1", &["Old Monk", "Bacardi"]);
        assert_eq!(repo.replace_all(&original).unwrap(), 2);

        let records = repo.read_all().unwrap();
        assert_eq!(records, original.records);

        let meta = repo.current_batch_meta().unwrap().unwrap();
        assert_eq!(meta.batch_id, "b1");
        assert_eq!(meta.format, SheetFormat::Tabular);
    }

    #[test]
    fn test_replace_discards_previous_batch() {
        let repo = repo();
        repo.replace_all(&batch("b1", &["A", "B", "C"])).unwrap();
        repo.replace_all(&batch("b2", &["D"])).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.read_all().unwrap()[0].brand_name, "D");
        assert_eq!(repo.current_batch_meta().unwrap().unwrap().batch_id, "b2");
    }

    #[test]
    fn test_empty_repository() {
        let repo = repo();
        assert!(repo.read_all().unwrap().is_empty());
        assert!(repo.current_batch_meta().unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
