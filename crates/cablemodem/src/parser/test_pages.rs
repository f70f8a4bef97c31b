//! Captured-style status pages used by the parser tests.

/// Trimmed down SB6183 status page: startup procedure, four downstream and
/// two upstream channels.
pub const SB6183_PAGE: &str = r#"<html>
<head>
<title>ARRIS SB6183 Status</title>
</head>
<body>
<div id="logo"><span id="thisModelNumberIs">SB6183</span></div>
<center>
<table class="simpleTable">
<tr><th colspan="3"><strong>Startup Procedure</strong></th></tr>
<tr><td><strong>Procedure</strong></td><td><strong>Status</strong></td><td><strong>Comment</strong></td></tr>
<tr><td>Acquire Downstream Channel</td><td>603000000 Hz</td><td>Locked</td></tr>
<tr><td>Connectivity State</td><td>OK</td><td>Operational</td></tr>
<tr><td>Boot State</td><td>OK</td><td>Operational</td></tr>
<tr><td>Configuration File</td><td>OK</td><td>d11_m_sb6183_speedtier_c01.cm</td></tr>
<tr><td>Security</td><td>Enabled</td><td>BPI+</td></tr>
<tr><td>DOCSIS Network Access Enabled</td><td>Allowed</td><td></td></tr>
</table>
<table class="simpleTable">
<tr><th colspan="9"><strong>Downstream Bonded Channels</strong></th></tr>
<tr><td><strong>Channel</strong></td><td><strong>Lock Status</strong></td><td><strong>Modulation</strong></td><td><strong>Channel ID</strong></td><td><strong>Frequency</strong></td><td><strong>Power</strong></td><td><strong>SNR</strong></td><td><strong>Corrected</strong></td><td><strong>Uncorrectables</strong></td></tr>
<tr><td>1</td><td>Locked</td><td>QAM256</td><td>21</td><td>603000000 Hz</td><td>5.7 dBmV</td><td>40.3 dB</td><td>12</td><td>0</td></tr>
<tr><td>2</td><td>Locked</td><td>QAM256</td><td>17</td><td>579000000 Hz</td><td>6.1 dBmV</td><td>40.9 dB</td><td>30</td><td>2</td></tr>
<tr><td>3</td><td>Locked</td><td>QAM256</td><td>18</td><td>585000000 Hz</td><td>5.9 dBmV</td><td>40.4 dB</td><td>8</td><td>1</td></tr>
<tr><td>4</td><td>Locked</td><td>QAM256</td><td>19</td><td>591000000 Hz</td><td>-1.3 dBmV</td><td>38.6 dB</td><td>0</td><td>0</td></tr>
</table>
<table class="simpleTable">
<tr><th colspan="7"><strong>Upstream Bonded Channels</strong></th></tr>
<tr><td><strong>Channel</strong></td><td><strong>Lock Status</strong></td><td><strong>US Channel Type</strong></td><td><strong>Channel ID</strong></td><td><strong>Symbol Rate</strong></td><td><strong>Frequency</strong></td><td><strong>Power</strong></td></tr>
<tr><td>1</td><td>Locked</td><td>ATDMA</td><td>3</td><td>5120 Ksym/sec</td><td>36000000 Hz</td><td>44.0 dBmV</td></tr>
<tr><td>2</td><td>Locked</td><td>ATDMA</td><td>2</td><td>5120 Ksym/sec</td><td>29600000 Hz</td><td>43.5 dBmV</td></tr>
</table>
</center>
</body>
</html>"#;

/// Page with a status table but none of the known sections.
pub const UNRELATED_PAGE: &str = r#"<html>
<head><title>Router Login</title></head>
<body>
<table class="loginTable">
<tr><th>Login</th></tr>
<tr><td>Username</td><td><input name="user"></td></tr>
</table>
</body>
</html>"#;

/// Wraps data rows in a downstream channel table with the usual two header
/// rows.
pub fn downstream_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table class="simpleTable">
<tr><th colspan="9">Downstream Bonded Channels</th></tr>
<tr><td>Channel</td><td>Lock Status</td><td>Modulation</td><td>Channel ID</td><td>Frequency</td><td>Power</td><td>SNR</td><td>Corrected</td><td>Uncorrectables</td></tr>
{}
</table></body></html>"#,
        rows.join("\n")
    )
}

/// Same as [`downstream_page`] for the upstream channel table.
pub fn upstream_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table class="simpleTable">
<tr><th colspan="7">Upstream Bonded Channels</th></tr>
<tr><td>Channel</td><td>Lock Status</td><td>US Channel Type</td><td>Channel ID</td><td>Symbol Rate</td><td>Frequency</td><td>Power</td></tr>
{}
</table></body></html>"#,
        rows.join("\n")
    )
}

/// Builds one `<tr>` out of the given cell texts.
pub fn row(cells: &[&str]) -> String {
    let cells: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
    format!("<tr>{cells}</tr>")
}
