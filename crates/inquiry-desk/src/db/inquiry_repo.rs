//! Inquiry repository: CRUD operations for the `inquiries` table.

use rusqlite::{params, Row};

use super::{search, Database, DatabaseError};

/// Columns matched by free-text search.
pub const SEARCH_COLUMNS: &[&str] = &["inquiry_no", "name", "phone", "email"];

/// A raw inquiry row from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryRow {
    pub id: String,
    pub inquiry_no: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub comment: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl InquiryRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            inquiry_no: row.get("inquiry_no")?,
            name: row.get("name")?,
            phone: row.get("phone")?,
            email: row.get("email")?,
            address: row.get("address")?,
            comment: row.get("comment")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Query filter parameters for inquiry listing.
#[derive(Debug, Default, Clone)]
pub struct InquiryFilter {
    pub status: Option<String>,
    /// Case-insensitive substring matched against [`SEARCH_COLUMNS`].
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Inserts a new inquiry row.
///
/// A duplicate `inquiry_no` surfaces as [`DatabaseError::UniqueViolation`].
pub fn insert(db: &Database, inquiry: &InquiryRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO inquiries (id, inquiry_no, name, phone, email, address, comment,
             status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                inquiry.id,
                inquiry.inquiry_no,
                inquiry.name,
                inquiry.phone,
                inquiry.email,
                inquiry.address,
                inquiry.comment,
                inquiry.status,
                inquiry.created_at,
                inquiry.updated_at,
            ],
        )?;
        Ok(())
    })
}

/// Finds an inquiry by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<InquiryRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM inquiries WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], InquiryRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::from(e)),
            None => Ok(None),
        }
    })
}

/// Queries inquiries with filters, returning (rows, total_count).
///
/// Rows are ordered newest first; rows created in the same instant keep
/// reverse insertion order.
pub fn query(
    db: &Database,
    filter: &InquiryFilter,
) -> Result<(Vec<InquiryRow>, u64), DatabaseError> {
    db.with_conn(|conn| {
        let mut conditions = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref status) = filter.status {
            conditions.push(format!("status = ?{}", param_values.len() + 1));
            param_values.push(Box::new(status.clone()));
        }
        if let Some(ref search) = filter.search {
            conditions.push(search::any_column_contains(
                SEARCH_COLUMNS,
                param_values.len() + 1,
            ));
            param_values.push(Box::new(search::contains_pattern(search)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Count total matching rows.
        let count_sql = format!("SELECT COUNT(*) FROM inquiries {}", where_clause);
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let total: u64 = conn.query_row(&count_sql, params_ref.as_slice(), |r| r.get(0))?;

        // Fetch paginated results.
        let limit = filter.limit.unwrap_or(100) as i64;
        let offset = filter.offset.unwrap_or(0) as i64;
        param_values.push(Box::new(limit));
        param_values.push(Box::new(offset));
        let query_sql = format!(
            "SELECT * FROM inquiries {} ORDER BY created_at DESC, rowid DESC LIMIT ?{} OFFSET ?{}",
            where_clause,
            param_values.len() - 1,
            param_values.len()
        );

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&query_sql)?;
        let rows: Vec<InquiryRow> = stmt
            .query_map(params_ref.as_slice(), InquiryRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    })
}

/// Counts inquiries whose `created_at` lies in `[from, until)`.
///
/// Bounds must use the same timestamp format as stored rows so that the
/// lexical comparison matches chronological order.
pub fn count_created_between(
    db: &Database,
    from: &str,
    until: &str,
) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM inquiries WHERE created_at >= ?1 AND created_at < ?2",
            params![from, until],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

/// Counts inquiries grouped by status. Statuses without rows are absent.
pub fn count_by_status(db: &Database) -> Result<Vec<(String, u64)>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT status, COUNT(*) FROM inquiries GROUP BY status ORDER BY status")?;
        let rows = stmt
            .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, u64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Updates the status and updated_at of an inquiry and returns the
/// resulting row, or `None` if no inquiry has that ID.
pub fn update_status(
    db: &Database,
    id: &str,
    status: &str,
    updated_at: &str,
) -> Result<Option<InquiryRow>, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE inquiries SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status, updated_at],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        let row = conn.query_row(
            "SELECT * FROM inquiries WHERE id = ?1",
            params![id],
            InquiryRow::from_row,
        )?;
        Ok(Some(row))
    })
}

/// Deletes an inquiry. Returns false if no inquiry has that ID.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM inquiries WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    })
}
