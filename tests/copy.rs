use pretty_assertions::assert_eq;
use sicxe_rs::{disassemble, parse_object, Disassembler, parse_report, DecodeSession};

const COPY_OBJ: &str = "\
HCOPY000000001077
T0000001D17202D69202D4B1010360320262900003320074B10105D3F2FEC032010
T00001D130F20160100030F200D4B10105D3E2003454F46
T0010361DB410B400B44075101000E32019332FFADB2013A00433200857C003B850
T0010531D3B2FEA1340004F0000F1B410774000E32011332FFA53C003DF2008B850
T001070073B2FEF4F000005
M00000705+COPY
M00001405+COPY
M00002705+COPY
E000000
";

const COPY_SYM: &str = "\
Symbol  Value   Flags:
-----------------------
FIRST   000000  R
CLOOP   000006  R
ENDFIL  00001A  R
EOF     00002D  R
RETADR  000030  R
LENGTH  000033  R
BUFFER  000036  R
RDREC   001036  R
RLOOP   001040  R
EXIT    001056  R
INPUT   00105C  R
WRREC   00105D  R
WLOOP   001062  R
OUTPUT  001076  R

Name    Literal  Length Address:
------------------------------
EOF     C'EOF'   6      00002D
INPUT   X'F1'    2      00105C
OUTPUT  X'05'    2      001076
";

const COPY_LST: &str = "\
0000\tCOPY\tSTART\t0
0000\tFIRST\tSTL\tRETADR\t17202D
0003\t\tLDB\t#LENGTH\t69202D
\t\tBASE\tLENGTH
0006\tCLOOP\t+JSUB\tRDREC\t4B101036
000A\t\tLDA\tLENGTH\t032026
000D\t\tCOMP\t#0\t290000
0010\t\tJEQ\tENDFIL\t332007
0013\t\t+JSUB\tWRREC\t4B10105D
0017\t\tJ\tCLOOP\t3F2FEC
001A\tENDFIL\tLDA\tEOF\t032010
001D\t\tSTA\tBUFFER\t0F2016
0020\t\tLDA\t#3\t010003
0023\t\tSTA\tLENGTH\t0F200D
0026\t\t+JSUB\tWRREC\t4B10105D
002A\t\tJ\t@RETADR\t3E2003
002D\tEOF\tBYTE\tC'EOF'\t454F46
0030\tRETADR\tRESB\t3
0033\tLENGTH\tRESB\t3
0036\tBUFFER\tRESB\t4096
1036\tRDREC\tCLEAR\tX\tB410
1038\t\tCLEAR\tA\tB400
103A\t\tCLEAR\tS\tB440
103C\t\t+LDT\t#\t75101000
1040\tRLOOP\tTD\tINPUT\tE32019
1043\t\tJEQ\tRLOOP\t332FFA
1046\t\tRD\tINPUT\tDB2013
1049\t\tCOMPR\tA,S\tA004
104B\t\tJEQ\tEXIT\t332008
104E\t\tSTCH\tRETADR,X\t57C003
1051\t\tTIXR\tT\tB850
1053\t\tJLT\tRLOOP\t3B2FEA
1056\tEXIT\tSTX\tEOF\t134000
1059\t\tRSUB\t0\t4F0000
105C\tINPUT\tBYTE\tX'F1'\tF1
105D\tWRREC\tCLEAR\tX\tB410
105F\t\tLDT\tEOF\t774000
1062\tWLOOP\tTD\tOUTPUT\tE32011
1065\t\tJEQ\tWLOOP\t332FFA
1068\t\tLDCH\tRETADR,X\t53C003
106B\t\tWD\tOUTPUT\tDF2008
106E\t\tTIXR\tT\tB850
1070\t\tJLT\tWLOOP\t3B2FEF
1073\t\tRSUB\t0\t4F0000
1076\tOUTPUT\tBYTE\tX'05'\t05
\t\tEND\tCOPY
";

#[test]
fn copy_program_listing() {
    let (lines, _) = disassemble(COPY_OBJ, COPY_SYM).unwrap();
    let text: String = lines.iter().map(|l| format!("{l}\n")).collect();
    assert_eq!(text, COPY_LST);
}

#[test]
fn pc_advance_matches_program_length() {
    let (_, summary) = disassemble(COPY_OBJ, COPY_SYM).unwrap();
    assert_eq!(summary.final_pc, 0x1077);
    assert_eq!(summary.bytes_decoded as u32 + summary.reserved_bytes, 0x1077);
    assert_eq!(summary.units, 40);
    assert_eq!(summary.reserved, 3);
    assert_eq!(summary.unknown, 0);
}

#[test]
fn runs_do_not_share_state() {
    let obj = parse_object(COPY_OBJ).unwrap();
    let dis = Disassembler::new(parse_report(COPY_SYM).unwrap());
    let mut first = Vec::new();
    let mut second = Vec::new();
    dis.run(&obj, &mut first).unwrap();
    dis.run(&obj, &mut second).unwrap();
    assert_eq!(first, second);

    let mut session = DecodeSession::new(0);
    dis.run_with(&mut session, &obj, &mut Vec::new()).unwrap();
    // LDB #LENGTH latched its displacement; the last CLEAR X left the index at zero
    assert_eq!((session.pc, session.base, session.index), (0x1077, 0x2D, 0));
}
