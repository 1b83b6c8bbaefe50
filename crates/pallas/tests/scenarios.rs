//! End-to-end scenarios across every backend through the facade.

#![cfg(all(feature = "props", feature = "sql", feature = "arrow"))]

use std::sync::Arc;

use anyhow::Result;
use arrow_schema::{DataType, Field, Schema};
use chrono::NaiveDate;
use pallas::arrow::{self, BatchRow, BatchWriter, ColumnError};
use pallas::prelude::*;
use pallas::props::{self, Properties, PropertyError};
use pallas::sql::{self, SqlError};
use rusqlite::{Connection, Row, Statement};

#[derive(Debug, Clone, PartialEq)]
struct Job {
    end_date: NaiveDate,
    num_threads: Option<i32>,
    env: String,
}

fn job_from_props() -> impl Extractor<Properties, Output = Job, Error = PropertyError> {
    combine(
        (
            props::property::<NaiveDate>("endDate"),
            props::get::<i32>().optional().bind("numThreads"),
            props::property::<String>("env"),
        ),
        |(end_date, num_threads, env): (NaiveDate, Option<i32>, String)| Job {
            end_date,
            num_threads,
            env,
        },
    )
}

fn job_into_props() -> impl Injector<Properties, Job, Error = PropertyError> {
    combine_into(
        (
            props::assign::<NaiveDate>("endDate"),
            props::set::<i32>().optional().bind("numThreads"),
            props::assign::<String>("env"),
        ),
        |j: Job| (j.end_date, j.num_threads, j.env),
    )
}

fn job_from_row() -> impl for<'s> Extractor<Row<'s>, Output = Job, Error = SqlError> {
    combine(
        (
            sql::named::<NaiveDate>("end_date"),
            sql::column_named::<i32>().optional().bind("num_threads"),
            sql::named::<String>("env"),
        ),
        |(end_date, num_threads, env): (NaiveDate, Option<i32>, String)| Job {
            end_date,
            num_threads,
            env,
        },
    )
}

fn job_into_statement<'conn>(
) -> impl for<'a> Injector<&'a mut Statement<'conn>, Job, Error = SqlError> {
    combine_into(
        (
            sql::bind_named::<NaiveDate>(":end_date"),
            sql::nullable_named::<i32>().bind(":num_threads"),
            sql::bind_named::<String>(":env"),
        ),
        |j: Job| (j.end_date, j.num_threads, j.env),
    )
}

fn job_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("end_date", DataType::Date32, false),
        Field::new("num_threads", DataType::Int32, true),
        Field::new("env", DataType::Utf8, false),
    ]))
}

fn job_into_batch() -> impl for<'w> Injector<&'w mut BatchWriter, Job, Error = ColumnError> {
    combine_into(
        (
            arrow::write_named::<NaiveDate>("end_date"),
            arrow::nullable_named::<i32>().bind("num_threads"),
            arrow::write_named::<String>("env"),
        ),
        |j: Job| (j.end_date, j.num_threads, j.env),
    )
}

fn job_from_batch<'a>() -> impl Extractor<BatchRow<'a>, Output = Job, Error = ColumnError> {
    combine(
        (
            arrow::named::<NaiveDate>("end_date"),
            arrow::column_named::<i32>().optional().bind("num_threads"),
            arrow::named::<String>("env"),
        ),
        |(end_date, num_threads, env): (NaiveDate, Option<i32>, String)| Job {
            end_date,
            num_threads,
            env,
        },
    )
}

fn expected_job() -> Job {
    Job {
        end_date: NaiveDate::from_ymd_opt(2021, 4, 19).unwrap(),
        num_threads: None,
        env: "DEV".to_string(),
    }
}

#[test]
fn properties_scenario() -> Result<()> {
    let mut source = Properties::new();
    source.set("endDate", "2021-04-19");
    source.set("env", "DEV");

    let job = job_from_props().extract(&source)?;
    assert_eq!(job, expected_job());

    let written = job_into_props().inject(Properties::new(), job.clone())?;
    assert!(!written.contains_key("numThreads"));
    assert_eq!(job_from_props().extract(&written)?, job);
    Ok(())
}

#[test]
fn one_record_through_every_backend() -> Result<()> {
    let job = Job {
        num_threads: Some(0),
        ..expected_job()
    };
    let jobs = vec![job, expected_job()];

    // Properties text -> Job
    let text = job_into_props()
        .inject(Properties::new(), jobs[0].clone())?
        .to_text();
    assert_eq!(job_from_props().extract(&Properties::parse(&text)?)?, jobs[0]);

    // Job -> SQLite -> Job
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("CREATE TABLE job (end_date TEXT, num_threads INTEGER, env TEXT)")?;
    let mut insert =
        conn.prepare("INSERT INTO job VALUES (:end_date, :num_threads, :env)")?;
    for job in &jobs {
        sql::execute(&mut insert, &job_into_statement(), job.clone())?;
    }
    let mut select = conn.prepare("SELECT * FROM job ORDER BY rowid")?;
    let from_sql = sql::query_rows(&mut select, &job_from_row())?;
    assert_eq!(from_sql, jobs);

    // Job -> Arrow -> Job
    let batch = arrow::write_rows(job_schema(), &job_into_batch(), from_sql)?;
    assert_eq!(arrow::read_rows(&batch, &job_from_batch())?, jobs);
    Ok(())
}

#[test]
fn absence_is_none_and_zero_is_present_in_every_backend() -> Result<()> {
    // Property map: missing key vs "0"
    let threads = props::get::<i32>().optional().bind("n");
    let mut map = Properties::new();
    assert_eq!(threads.extract(&map)?, None);
    map.set("n", "0");
    assert_eq!(threads.extract(&map)?, Some(0));

    // SQLite: NULL vs 0
    let conn = Connection::open_in_memory()?;
    let mut stmt = conn.prepare("SELECT NULL, 0")?;
    let cells = (
        sql::column::<i32>().optional().bind(0_usize),
        sql::column::<i32>().optional().bind(1_usize),
    );
    assert_eq!(sql::query_rows(&mut stmt, &cells)?, vec![(None, Some(0))]);

    // Arrow: unset validity bit vs 0
    let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int32, true)]));
    let batch = arrow::write_rows(
        schema,
        &arrow::nullable::<i32>().bind(0_usize),
        vec![None, Some(0)],
    )?;
    let cells = arrow::read_rows(&batch, &arrow::column::<i32>().optional().bind(0_usize))?;
    assert_eq!(cells, vec![None, Some(0)]);
    Ok(())
}

#[test]
fn injecting_none_writes_nothing() -> Result<()> {
    let mut map = Properties::new();
    map.set("keep", "1");
    let map = props::set::<i32>()
        .optional()
        .bind("numThreads")
        .inject(map, None)?;
    assert_eq!(map.len(), 1);
    assert!(!map.contains_key("numThreads"));

    let mut writer = BatchWriter::new(Arc::new(Schema::new(vec![Field::new(
        "n",
        DataType::Int32,
        true,
    )])))?;
    arrow::append::<i32>()
        .optional()
        .bind(0_usize)
        .inject(&mut writer, None)?;
    assert_eq!(writer.num_rows(), 0);

    let conn = Connection::open_in_memory()?;
    conn.execute_batch("CREATE TABLE t (n INTEGER)")?;
    let mut insert = conn.prepare("INSERT INTO t VALUES (?1)")?;
    let cell = sql::param::<i32>().optional().bind(1_usize);
    sql::execute(&mut insert, &cell, Some(4))?;
    sql::execute(&mut insert, &cell, None)?;
    let mut select = conn.prepare("SELECT n FROM t ORDER BY rowid")?;
    assert_eq!(sql::query_rows(&mut select, &sql::at::<i32>(0))?, vec![4, 4]);
    Ok(())
}

#[test]
fn unchecked_keeps_the_backend_cause() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    let mut stmt = conn.prepare("SELECT NULL AS env")?;
    let mut rows = stmt.query([])?;
    let row = rows.next()?.expect("one row");

    let env = sql::named::<String>("env").unchecked();
    let err = catch_unchecked(|| env.get(row)).unwrap_err();

    let cause = err.downcast_ref::<SqlError>().expect("sql error cause");
    assert!(matches!(cause, SqlError::Null { column } if column == "env"));
    assert!(cause.is_absent());
    Ok(())
}

#[test]
fn failures_are_not_absence() {
    let mut map = Properties::new();
    map.set("numThreads", "four");
    let err = props::get::<i32>()
        .optional()
        .bind("numThreads")
        .extract(&map)
        .unwrap_err();
    assert!(matches!(err, PropertyError::Parse { .. }));
    assert!(!err.is_absent());
}
