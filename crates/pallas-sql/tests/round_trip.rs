//! Writing rows through statement injectors and reading them back through
//! row extractors, against an in-memory SQLite database.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use pallas_core::{combine, combine_into, Extractor, Injector, KeyedExtractor, KeyedInjector};
use pallas_sql::{
    at, bind_at, bind_named, column, execute, named, nullable, query_rows, SqlError,
};
use proptest::prelude::*;
use rusqlite::{Connection, Row, Statement};

#[derive(Debug, Clone, PartialEq)]
struct Shipment {
    id: i64,
    active: bool,
    weight: f64,
    label: String,
    shipped_on: NaiveDate,
    cutoff: NaiveTime,
    delivered_at: Option<NaiveDateTime>,
}

const SCHEMA: &str = "CREATE TABLE shipment (
    id INTEGER PRIMARY KEY,
    active INTEGER NOT NULL,
    weight REAL NOT NULL,
    label TEXT NOT NULL,
    shipped_on TEXT NOT NULL,
    cutoff TEXT NOT NULL,
    delivered_at TEXT
)";

fn writer<'conn>() -> impl for<'a> Injector<&'a mut Statement<'conn>, Shipment, Error = SqlError> {
    combine_into(
        (
            bind_at::<i64>(1),
            bind_at::<bool>(2),
            bind_at::<f64>(3),
            bind_at::<String>(4),
            bind_at::<NaiveDate>(5),
            bind_at::<NaiveTime>(6),
            nullable::<NaiveDateTime>().bind(7_usize),
        ),
        |s: Shipment| {
            (
                s.id,
                s.active,
                s.weight,
                s.label,
                s.shipped_on,
                s.cutoff,
                s.delivered_at,
            )
        },
    )
}

fn reader() -> impl for<'s> Extractor<Row<'s>, Output = Shipment, Error = SqlError> {
    combine(
        (
            named::<i64>("id"),
            named::<bool>("active"),
            named::<f64>("weight"),
            named::<String>("label"),
            at::<NaiveDate>(4),
            at::<NaiveTime>(5),
            column::<NaiveDateTime>().optional().bind(6_usize),
        ),
        |(id, active, weight, label, shipped_on, cutoff, delivered_at): (
            i64,
            bool,
            f64,
            String,
            NaiveDate,
            NaiveTime,
            Option<NaiveDateTime>,
        )| Shipment {
            id,
            active,
            weight,
            label,
            shipped_on,
            cutoff,
            delivered_at,
        },
    )
}

fn store_and_load(conn: &Connection, shipments: &[Shipment]) -> Result<Vec<Shipment>> {
    let mut insert = conn.prepare("INSERT INTO shipment VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)")?;
    let write = writer();
    for shipment in shipments {
        execute(&mut insert, &write, shipment.clone())?;
    }

    let mut select = conn.prepare("SELECT * FROM shipment ORDER BY id")?;
    Ok(query_rows(&mut select, &reader())?)
}

fn shipment(id: i64, delivered_at: Option<NaiveDateTime>) -> Shipment {
    Shipment {
        id,
        active: id % 2 == 0,
        weight: 12.5,
        label: format!("crate-{id}"),
        shipped_on: NaiveDate::from_ymd_opt(2021, 4, 19).unwrap(),
        cutoff: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
        delivered_at,
    }
}

#[test]
fn rows_round_trip_with_and_without_nulls() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;

    let delivered = NaiveDate::from_ymd_opt(2021, 4, 21)
        .unwrap()
        .and_hms_milli_opt(9, 5, 0, 125)
        .unwrap();
    let shipments = vec![shipment(1, None), shipment(2, Some(delivered))];

    assert_eq!(store_and_load(&conn, &shipments)?, shipments);
    Ok(())
}

#[test]
fn required_column_rejects_null() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    let mut stmt = conn.prepare("SELECT NULL AS delivered_at")?;

    let err = query_rows(&mut stmt, &named::<NaiveDateTime>("delivered_at")).unwrap_err();
    assert!(matches!(err, SqlError::Null { ref column } if column == "delivered_at"));
    Ok(())
}

#[test]
fn named_parameters_in_any_order() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("CREATE TABLE kv (k TEXT, v INTEGER)")?;

    let mut insert = conn.prepare("INSERT INTO kv VALUES (:key, :value)")?;
    let write = (bind_named::<i64>(":value"), bind_named::<String>(":key"));
    execute(&mut insert, &write, (3, "three".to_string()))?;

    let mut select = conn.prepare("SELECT k, v FROM kv")?;
    let rows = query_rows(&mut select, &(at::<String>(0), at::<i64>(1)))?;
    assert_eq!(rows, vec![("three".to_string(), 3)]);
    Ok(())
}

#[test]
fn query_parameters_bound_by_injector() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    store_and_load(&conn, &[shipment(1, None), shipment(2, None), shipment(3, None)])?;

    let mut select = conn.prepare("SELECT * FROM shipment WHERE id >= ?1 ORDER BY id")?;
    bind_at::<i64>(1).inject(&mut select, 2)?;
    let ids: Vec<i64> = query_rows(&mut select, &named::<i64>("id"))?;
    assert_eq!(ids, vec![2, 3]);
    Ok(())
}

proptest! {
    #[test]
    fn scalar_values_round_trip(
        n in any::<i64>(),
        x in any::<f64>().prop_filter("finite", |v| v.is_finite()),
        s in ".*",
        flag in any::<bool>(),
        maybe in proptest::option::of(any::<i32>()),
    ) {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT ?1, ?2, ?3, ?4, ?5").unwrap();

        let write = (
            bind_at::<i64>(1),
            bind_at::<f64>(2),
            bind_at::<String>(3),
            bind_at::<bool>(4),
            nullable::<i32>().bind(5_usize),
        );
        write.inject(&mut stmt, (n, x, s.clone(), flag, maybe)).unwrap();

        let read = (
            at::<i64>(0),
            at::<f64>(1),
            at::<String>(2),
            at::<bool>(3),
            column::<i32>().optional().bind(4_usize),
        );
        let rows = query_rows(&mut stmt, &read).unwrap();
        prop_assert_eq!(rows, vec![(n, x, s, flag, maybe)]);
    }
}
