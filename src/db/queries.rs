use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus};

// ── Reads ──

/// Pending bookings for one date key. This is what the availability view
/// subtracts from the slot catalog.
pub fn pending_by_date(conn: &Connection, date: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, time, date, status FROM bookings WHERE date = ?1 AND status = 'pending'",
    )?;

    let rows = stmt.query_map(params![date], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn bookings_by_date(conn: &Connection, date: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, time, date, status FROM bookings WHERE date = ?1 ORDER BY time ASC",
    )?;

    let rows = stmt.query_map(params![date], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn recent_bookings(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, time, date, status FROM bookings ORDER BY id DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

// ── Writes ──

pub fn insert_booking(
    conn: &Connection,
    name: &str,
    time: &str,
    date: &str,
    status: &BookingStatus,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO bookings (name, time, date, status) VALUES (?1, ?2, ?3, ?4)",
        params![name, time, date, status.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Reserves (date, time) for `name` in a single conditional insert: the
/// row lands only while no non-cancelled booking holds the pair, so of two
/// racing claims exactly one wins. Returns whether this claim won.
pub fn claim_slot(conn: &Connection, name: &str, time: &str, date: &str) -> anyhow::Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO bookings (name, time, date, status)
         SELECT ?1, ?2, ?3, 'pending'
         WHERE NOT EXISTS (
             SELECT 1 FROM bookings WHERE date = ?3 AND time = ?2 AND status != 'cancelled'
         )",
        params![name, time, date],
    )?;
    Ok(inserted > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let status_str: String = row.get(4)?;

    Ok(Booking {
        id: row.get(0)?,
        name: row.get(1)?,
        time: row.get(2)?,
        date: row.get(3)?,
        status: BookingStatus::parse(&status_str),
    })
}
