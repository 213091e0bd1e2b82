// Shared fixtures for the integration tests

#![allow(dead_code)]

use footy_data::parse_csv;
use footy_models::MatchRecord;

/// Two seasons of a four-team league, `Genk` dominant at home.
pub const LEAGUE_CSV: &str = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR,B365H,B365D,B365A
2022-08-06,Genk,Gent,3,1,H,1.80,3.60,4.20
2022-08-13,Union,Antwerp,1,1,D,2.40,3.30,2.90
2022-08-20,Gent,Union,0,2,A,2.60,3.20,2.70
2022-08-27,Antwerp,Genk,1,2,A,2.90,3.30,2.40
2022-09-03,Genk,Union,2,0,H,1.90,3.50,4.00
2022-09-10,Gent,Antwerp,1,1,D,2.30,3.20,3.10
2023-02-04,Union,Genk,1,1,D,2.50,3.30,2.80
2023-02-11,Antwerp,Gent,2,0,H,2.00,3.40,3.60
2023-08-05,Genk,Antwerp,4,0,H,1.60,3.90,5.50
2023-08-12,Gent,Genk,1,3,A,3.20,3.40,2.20
2023-08-19,Union,Gent,2,2,D,1.90,3.50,4.00
2023-08-26,Genk,Union,2,1,H,1.85,3.60,4.10
2023-09-02,Antwerp,Union,0,1,A,2.70,3.20,2.60
2023-09-09,Gent,Antwerp,2,1,H,2.40,3.30,2.90
2024-01-20,Genk,Gent,2,0,H,1.70,3.80,4.80
2024-01-27,Union,Antwerp,3,0,H,1.75,3.70,4.60
";

pub fn league() -> Vec<MatchRecord> {
    let (records, report) = parse_csv(LEAGUE_CSV).expect("fixture CSV parses");
    assert_eq!(report.dropped, 0);
    records
}
